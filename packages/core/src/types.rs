use serde::{Deserialize, Deserializer, Serialize};

/// Reads a field that may be `null`, treating `null` like a missing field.
/// `serde_json` writes non-finite numbers as `null`, so a catalog file can
/// contain them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

fn default_status() -> bool {
    true
}

/// A catalog entry as stored on disk and pushed to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default = "default_status", deserialize_with = "null_as_active")]
    pub status: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnails: Vec<String>,
}

impl Product {
    /// Builds a product from creation input.
    pub fn new(id: u64, input: ProductCreateInput) -> Self {
        Product {
            id,
            title: input.title,
            description: input.description,
            code: input.code,
            price: input.price,
            // Only an absent status means active. An explicit `false` is kept,
            // unlike update, which always ends active.
            status: input.status.unwrap_or(true),
            stock: input.stock,
            category: input.category,
            thumbnails: input.thumbnails,
        }
    }
}

/// Input for creating a new product. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductCreateInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnails: Vec<String>,
}

/// Partial update of a product. `id` and `code` cannot be changed, so they
/// are not part of the input; unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdateInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_product_json_field_names() {
        let product = Product::new(
            7,
            ProductCreateInput {
                title: "Pen".to_string(),
                code: "P1".to_string(),
                price: 1.5,
                stock: 10,
                category: "office".to_string(),
                ..Default::default()
            },
        );

        let value = serde_json::to_value(&product).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();

        for key in [
            "id",
            "title",
            "description",
            "code",
            "price",
            "status",
            "stock",
            "category",
            "thumbnails",
        ] {
            assert!(keys.contains(&key), "missing key {}", key);
        }
        assert_eq!(value["id"], 7);
        assert_eq!(value["status"], true);
    }

    #[test]
    fn test_product_missing_fields_take_defaults() {
        let product: Product = serde_json::from_str(r#"{"id": 3, "code": "X"}"#).unwrap();

        assert_eq!(product.id, 3);
        assert_eq!(product.code, "X");
        assert_eq!(product.title, "");
        assert!(product.status);
        assert!(product.thumbnails.is_empty());
    }

    #[test]
    fn test_new_product_respects_explicit_status() {
        let input = ProductCreateInput {
            code: "Z".to_string(),
            status: Some(false),
            ..Default::default()
        };

        assert!(!Product::new(1, input).status);
    }

    #[test]
    fn test_product_null_fields_take_defaults() {
        let product: Product = serde_json::from_str(
            r#"{"id": 2, "title": null, "code": "N", "price": null, "stock": null,
                "status": null, "category": null, "thumbnails": null}"#,
        )
        .unwrap();

        assert_eq!(product.id, 2);
        assert_eq!(product.code, "N");
        assert_eq!(product.title, "");
        assert_eq!(product.price, 0.0);
        assert_eq!(product.stock, 0);
        assert!(product.status);
        assert!(product.thumbnails.is_empty());
    }

    #[test]
    fn test_create_input_accepts_null_fields() {
        let input: ProductCreateInput =
            serde_json::from_str(r#"{"code": "N", "price": null, "status": null}"#).unwrap();

        assert_eq!(input.price, 0.0);
        assert_eq!(input.status, None);
        assert!(Product::new(1, input).status);
    }

    #[test]
    fn test_update_input_ignores_code() {
        let input: ProductUpdateInput =
            serde_json::from_str(r#"{"code": "NEW", "title": "Renamed"}"#).unwrap();

        assert_eq!(input.title.as_deref(), Some("Renamed"));
        assert_eq!(input.status, None);
    }
}
