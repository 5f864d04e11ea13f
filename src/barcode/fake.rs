use std::collections::HashMap;

use async_trait::async_trait;

use super::dto::BarcodeProduct;
use super::{LookupError, ProductLookup};
use crate::nutrients::Micronutrients;

/// In-memory product database for tests.
#[derive(Default)]
pub struct FakeProducts {
    fail: bool,
    products: HashMap<String, BarcodeProduct>,
}

impl FakeProducts {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, product: BarcodeProduct) -> Self {
        self.products.insert(product.barcode.clone(), product);
        self
    }
}

pub fn product(barcode: &str, name: &str) -> BarcodeProduct {
    BarcodeProduct {
        barcode: barcode.into(),
        name: name.into(),
        brand: String::new(),
        serving_size: "100g".into(),
        image_url: String::new(),
        calories: 100.0,
        protein_g: 3.0,
        carbs_g: 20.0,
        fat_g: 1.0,
        fiber_g: 2.0,
        sugar_g: 5.0,
        sodium_mg: 0.0,
        micronutrients: Micronutrients::default(),
    }
}

#[async_trait]
impl ProductLookup for FakeProducts {
    async fn lookup(&self, barcode: &str) -> Result<Option<BarcodeProduct>, LookupError> {
        if self.fail {
            return Err(LookupError::Status(503));
        }
        Ok(self.products.get(barcode).cloned())
    }
}
