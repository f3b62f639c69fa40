use crate::ring::{SLOT_COUNT, Slot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl FaqItem {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    fn placeholder(slot: Slot) -> Self {
        Self::new(format!("FAQ {}", slot.index() + 1), "")
    }
}

const DEFAULT_FAQS: [(&str, &str); SLOT_COUNT] = [
    (
        "How to pay?",
        "We accept card, mobile money and in-person over-the-counter payments.",
    ),
    (
        "Return policy?",
        "Return within 7 days with receipt in original condition for a full refund.",
    ),
    (
        "Shipping time?",
        "Standard shipping is 3-5 business days. Expedited in 1-2 days.",
    ),
    (
        "Size guides?",
        "Each product page has sizing. Contact us if unsure and we'll help.",
    ),
    (
        "Coupons & discounts?",
        "Coupons are applied at checkout. See terms for min spend.",
    ),
    ("Store hours?", "We are open Mon-Sat, 9am-6pm local time."),
    (
        "Bulk orders?",
        "Contact sales for bulk pricing and dedicated support.",
    ),
    (
        "Contact support?",
        "Use the 'Tell us' button to open a message, or raise a query in account settings.",
    ),
];

pub fn default_items() -> Vec<FaqItem> {
    DEFAULT_FAQS
        .iter()
        .map(|(title, body)| FaqItem::new(*title, *body))
        .collect()
}

/// One item per slot: extra items are dropped, missing ones get a placeholder.
pub fn fill_ring(items: &[FaqItem]) -> Vec<FaqItem> {
    use strum::IntoEnumIterator;

    Slot::iter()
        .map(|slot| {
            items
                .get(slot.index())
                .cloned()
                .unwrap_or_else(|| FaqItem::placeholder(slot))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_slot() {
        assert_eq!(default_items().len(), SLOT_COUNT);
        assert_eq!(default_items()[0].title, "How to pay?");
    }

    #[test]
    fn test_fill_ring_pads_and_truncates() {
        let filled = fill_ring(&[FaqItem::new("Only one", "body")]);
        assert_eq!(filled.len(), SLOT_COUNT);
        assert_eq!(filled[0].title, "Only one");
        assert_eq!(filled[7], FaqItem::new("FAQ 8", ""));

        let many: Vec<_> = (0..12).map(|i| FaqItem::new(i.to_string(), "")).collect();
        assert_eq!(fill_ring(&many).len(), SLOT_COUNT);
    }

    #[test]
    fn test_body_is_optional_in_toml_like_input() {
        let item: FaqItem = serde_json::from_str(r#"{"title": "Hours?"}"#).unwrap();
        assert_eq!(item.body, "");
    }
}
