//! crates/ancient_eats_core/src/catalog.rs
//!
//! The static product catalog. Built once at startup and never mutated.

use crate::domain::{Product, ProductCategory};

/// The read-only set of purchasable products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            products: default_products(),
        }
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".into(),
            name: "Roman Feast Chronicles".into(),
            description: "Experience the grandeur of ancient Roman banquets through interactive recipes and historical narratives.".into(),
            price: "$12.99".into(),
            category: ProductCategory::Ebook,
            icon: "🏛️".into(),
            detailed_description: Some("Dive deep into the opulent world of Roman dining culture, from the simple meals of common citizens to the extravagant banquets of emperors. This comprehensive guide includes authentic recipes, dining etiquette, and the social significance of food in ancient Rome.".into()),
            historical_context: Some("Roman dining was a complex social ritual that reflected status, wealth, and cultural values. The wealthy Romans would host elaborate dinner parties called \"convivium\" that could last for hours, featuring multiple courses and entertainment.".into()),
            ingredients: Some(owned(&["Garum (fermented fish sauce)", "Honey", "Wine", "Olive oil", "Various herbs and spices", "Wheat flour"])),
            techniques: None,
            sample_content: Some("Recipe for Libum (Roman Cheesecake): Mix 2 pounds of cheese with 1 pound of wheat flour. Add one egg and mix well. Shape into a loaf, wrap in bay leaves, and bake slowly on a hearth stone...".into()),
        },
        Product {
            id: "2".into(),
            name: "Egyptian Bread Making".into(),
            description: "Master the ancient art of Egyptian bread making with traditional techniques and ingredients.".into(),
            price: "$24.99".into(),
            category: ProductCategory::Workshop,
            icon: "🍞".into(),
            detailed_description: Some("Learn the sacred art of bread making as practiced by ancient Egyptian bakers. This hands-on workshop covers traditional fermentation methods, ancient grain varieties, and the spiritual significance of bread in Egyptian culture.".into()),
            historical_context: Some("Bread was the cornerstone of ancient Egyptian diet and economy. Egyptian bakers were highly respected craftsmen, and bread was so important it was used as currency and offered to the gods in religious ceremonies.".into()),
            techniques: Some(owned(&["Wild yeast cultivation", "Clay oven construction", "Ancient grain milling", "Traditional kneading methods", "Sacred baking rituals"])),
            ingredients: Some(owned(&["Emmer wheat", "Wild yeast starter", "Nile water", "Date syrup", "Sesame seeds"])),
            sample_content: Some("Day 1: Creating your wild yeast starter using ancient methods. We begin by mixing emmer flour with Nile-style water and allowing natural fermentation to occur over several days...".into()),
        },
        Product {
            id: "3".into(),
            name: "Medieval Monastery Meals".into(),
            description: "Discover the simple yet profound culinary traditions of medieval monastic life.".into(),
            price: "$15.99".into(),
            category: ProductCategory::Ebook,
            icon: "⛪".into(),
            detailed_description: Some("Explore the humble yet nourishing cuisine of medieval monasteries, where food was prepared with prayer and consumed in contemplative silence. Learn about seasonal eating, preservation techniques, and the spiritual aspects of cooking.".into()),
            historical_context: Some("Medieval monasteries were centers of agricultural innovation and food preservation. Monks developed many techniques for brewing, cheese-making, and herb cultivation that influenced European cuisine for centuries.".into()),
            ingredients: Some(owned(&["Barley", "Root vegetables", "Herbs from monastery gardens", "Preserved meats", "Monastery-brewed ale", "Fresh dairy"])),
            techniques: None,
            sample_content: Some("Brother Benedict's Pottage: A hearty stew made from barley, turnips, and whatever vegetables the monastery garden provided. This simple dish sustained monks through long days of prayer and labor...".into()),
        },
        Product {
            id: "4".into(),
            name: "Ancient Fermentation Secrets".into(),
            description: "Learn the lost art of ancient fermentation techniques from around the world.".into(),
            price: "$29.99".into(),
            category: ProductCategory::Workshop,
            icon: "🍯".into(),
            detailed_description: Some("Master the ancient science of fermentation through hands-on practice with traditional methods from various cultures. Create your own fermented foods using time-tested techniques that predate modern refrigeration.".into()),
            historical_context: Some("Fermentation was humanity's first biotechnology, allowing our ancestors to preserve food, create alcoholic beverages, and develop complex flavors. Different cultures developed unique fermentation traditions based on local ingredients and climate.".into()),
            techniques: Some(owned(&["Wild fermentation", "Clay vessel preparation", "Traditional timing methods", "Natural preservation", "Flavor development"])),
            ingredients: Some(owned(&["Various grains and vegetables", "Wild yeasts and bacteria", "Sea salt", "Honey", "Traditional fermentation vessels"])),
            sample_content: Some("Creating Kvass: This ancient Slavic fermented beverage begins with stale bread and natural fermentation. The process teaches patience and observation as you learn to read the signs of proper fermentation...".into()),
        },
        Product {
            id: "5".into(),
            name: "Viking Feast Adventures".into(),
            description: "Journey through the harsh lands of the Vikings and their hearty, survival-based cuisine.".into(),
            price: "$18.99".into(),
            category: ProductCategory::Ebook,
            icon: "⚔️".into(),
            detailed_description: Some("Experience the robust flavors of Viking cuisine, designed for warriors and seafarers who needed sustaining meals for long journeys and harsh winters. Learn about preservation techniques, foraging, and the social aspects of Viking feasting.".into()),
            historical_context: Some("Viking cuisine was shaped by the harsh Scandinavian climate and the need for portable, long-lasting foods during raids and exploration. Feasting was central to Viking culture, strengthening bonds between warriors and celebrating victories.".into()),
            ingredients: Some(owned(&["Preserved fish", "Game meats", "Root vegetables", "Wild berries", "Fermented dairy", "Mead and ale"])),
            techniques: None,
            sample_content: Some("Preparing for a Viking Feast: The great hall fills with smoke from the central fire as whole animals roast on spits. Mead flows freely as warriors share tales of their adventures...".into()),
        },
        Product {
            id: "6".into(),
            name: "Spice Road Treasures".into(),
            description: "Follow the ancient spice routes and learn to recreate the exotic flavors that shaped history.".into(),
            price: "$22.99".into(),
            category: ProductCategory::Ebook,
            icon: "🌶️".into(),
            detailed_description: Some("Embark on a culinary journey along the ancient spice routes, discovering how precious spices transformed cuisines and economies across continents. Learn to use traditional spice combinations and preservation methods.".into()),
            historical_context: Some("The spice trade was one of the most important economic forces in ancient history, connecting East and West and driving exploration and cultural exchange. Spices were literally worth their weight in gold.".into()),
            ingredients: Some(owned(&["Cinnamon", "Black pepper", "Cardamom", "Saffron", "Star anise", "Cloves", "Nutmeg"])),
            techniques: None,
            sample_content: Some("The Merchant's Blend: A carefully guarded recipe from ancient Damascus, combining seven precious spices in proportions that create a flavor profile both exotic and harmonious...".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn product_ids_are_unique() {
        let catalog = Catalog::new();
        let ids: HashSet<&str> = catalog.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.all().len());
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::new();
        let bread = catalog.get("2").unwrap();
        assert_eq!(bread.name, "Egyptian Bread Making");
        assert_eq!(bread.category, ProductCategory::Workshop);
        assert_eq!(bread.price, "$24.99");
        assert!(catalog.get("999").is_none());
    }
}
