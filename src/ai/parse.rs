use tracing::warn;

use super::dto::{ChatSuggestion, FoodAnalysis};
use super::AiError;
use crate::nutrients::Micronutrients;

const RAW_PREVIEW_CHARS: usize = 200;

/// Pulls the JSON payload out of a model reply, which may wrap it in a
/// ```` ```json ```` fence, a bare fence, or send it as-is.
pub fn extract_json(reply: &str) -> &str {
    let fenced = |marker: &str| {
        reply.find(marker).map(|start| {
            let body = &reply[start + marker.len()..];
            let end = body.find("```").unwrap_or(body.len());
            body[..end].trim()
        })
    };
    fenced("```json")
        .or_else(|| fenced("```"))
        .unwrap_or_else(|| reply.trim())
}

fn preview(reply: &str) -> String {
    reply.chars().take(RAW_PREVIEW_CHARS).collect()
}

/// An unparseable analysis still yields a well-formed, empty result.
pub fn parse_analysis(reply: &str) -> FoodAnalysis {
    match serde_json::from_str::<FoodAnalysis>(extract_json(reply)) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(error = %e, raw = %preview(reply), "food analysis reply was not valid JSON");
            FoodAnalysis {
                items: Vec::new(),
                confidence: "low".into(),
                notes: format!("Could not parse AI response. Raw response: {}...", preview(reply)),
                error: Some("json_parse_failed".into()),
            }
        }
    }
}

/// An unparseable chat reply is passed through as a clarification request.
pub fn parse_chat(reply: &str) -> ChatSuggestion {
    match serde_json::from_str::<ChatSuggestion>(extract_json(reply)) {
        Ok(suggestion) => suggestion,
        Err(e) => {
            warn!(error = %e, raw = %preview(reply), "chat reply was not valid JSON");
            let message = if reply.trim().is_empty() {
                "I couldn't process that. Could you try again?".to_string()
            } else {
                reply.to_string()
            };
            ChatSuggestion {
                needs_clarification: true,
                message,
                ..ChatSuggestion::default()
            }
        }
    }
}

pub fn parse_micronutrients(reply: &str) -> Result<Micronutrients, AiError> {
    Ok(serde_json::from_str(extract_json(reply))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_json_fence() {
        let reply = "Sure!\n```json\n{\"a\": 1}\n```\nEnjoy";
        assert_eq!(extract_json(reply), "{\"a\": 1}");
    }

    #[test]
    fn extracts_from_bare_fence_and_raw_text() {
        assert_eq!(extract_json("```\n[1,2]\n```"), "[1,2]");
        assert_eq!(extract_json("  {\"b\":2}\n"), "{\"b\":2}");
        assert_eq!(extract_json("```json\n{\"open\":true}"), "{\"open\":true}");
    }

    #[test]
    fn analysis_reads_items_and_micros() {
        let reply = r#"```json
        {"items":[{"name":"Banana","serving_size":"1 medium","calories":105,
          "protein_g":1.3,"carbs_g":27,"fat_g":0.4,"fiber_g":3.1,"sugar_g":14,
          "micronutrients":{"potassium_mg":422,"vitamin_c_mg":10.3}}],
         "confidence":"high","notes":"single fruit"}
        ```"#;
        let a = parse_analysis(reply);
        assert_eq!(a.items.len(), 1);
        assert_eq!(a.items[0].name, "Banana");
        let micros = a.items[0].micronutrients.as_ref().unwrap();
        assert_eq!(micros.potassium_mg, 422.0);
        assert_eq!(micros.zinc_mg, 0.0);
        assert!(a.error.is_none());
    }

    #[test]
    fn analysis_falls_back_on_garbage() {
        let a = parse_analysis("I see a sandwich, probably 400 kcal.");
        assert!(a.items.is_empty());
        assert_eq!(a.confidence, "low");
        assert_eq!(a.error.as_deref(), Some("json_parse_failed"));
        assert!(a.notes.contains("I see a sandwich"));
    }

    #[test]
    fn chat_reads_actions() {
        let reply = r#"{"items":[],"actions":{"water_ml":500,"exercise":{"type":"Running","duration_minutes":30,"notes":""}},
            "needs_clarification":false,"message":"Logged your run and two glasses of water."}"#;
        let s = parse_chat(reply);
        assert_eq!(s.actions.water_ml, 500.0);
        assert_eq!(s.actions.exercise.as_ref().unwrap().kind, "Running");
        assert!(!s.needs_clarification);
    }

    #[test]
    fn chat_falls_back_to_clarification() {
        let s = parse_chat("How big was the bowl?");
        assert!(s.needs_clarification);
        assert!(s.items.is_empty());
        assert_eq!(s.message, "How big was the bowl?");
        assert!(parse_chat("   ").message.starts_with("I couldn't process"));
    }

    #[test]
    fn micronutrient_estimate_requires_json() {
        let m = parse_micronutrients("```json\n{\"vitamin_d_mcg\": 25}\n```").unwrap();
        assert_eq!(m.vitamin_d_mcg, 25.0);
        assert!(matches!(parse_micronutrients("none"), Err(AiError::Parse(_))));
    }
}
