//! crates/ancient_eats_core/src/prompt.rs
//!
//! Builds the text prompt handed to the image generator.

use crate::domain::ProductCategory;

/// Pure concatenation of four fixed template fragments; no conditional logic,
/// no escaping.
pub fn generate_promo_prompt(
    product_name: &str,
    description: &str,
    category: ProductCategory,
) -> String {
    let category = match category {
        ProductCategory::Ebook => "ebook",
        ProductCategory::Workshop => "workshop",
    };
    let base_prompt = format!(
        "Create a beautiful, appetizing promotional image for \"{product_name}\", an ancient culinary {category}. "
    );
    let style_prompt = "The image should have a warm, historical atmosphere with rich colors and textures that evoke ancient times. ";
    let content_prompt = format!("Focus on: {description}. ");
    let technical_prompt = "Style: photorealistic, warm lighting, rustic textures, ancient cooking implements, historical ambiance.";

    format!("{base_prompt}{style_prompt}{content_prompt}{technical_prompt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_pure_and_contains_inputs() {
        let a = generate_promo_prompt("Roman Feast", "banquets of Rome", ProductCategory::Ebook);
        let b = generate_promo_prompt("Roman Feast", "banquets of Rome", ProductCategory::Ebook);
        assert_eq!(a, b);
        assert!(a.contains("Roman Feast"));
        assert!(a.contains("banquets of Rome"));
        assert!(a.contains("ebook"));
    }

    #[test]
    fn prompt_names_the_workshop_category() {
        let p = generate_promo_prompt("Bread", "emmer loaves", ProductCategory::Workshop);
        assert!(p.contains("ancient culinary workshop"));
    }
}
