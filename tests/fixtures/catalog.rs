use fake::faker::lorem::en::Sentence;
use fake::Fake;

use storefront::catalog::ProductDraft;

/// Draft against the seeded reference data: category `Male`, type `Shirt`,
/// size `M`. Callers override what their case needs.
pub fn shirt_draft(name: &str, color: &str, group: Option<&str>) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: Sentence(3..6).fake(),
        price: (10.0f64..90.0f64).fake::<f64>(),
        stock: 10,
        image_url: None,
        category: "Male".to_string(),
        kind: "Shirt".to_string(),
        size: "M".to_string(),
        color: color.to_string(),
        group: group.map(str::to_string),
    }
}
