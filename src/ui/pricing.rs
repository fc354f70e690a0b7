//! Pricing dialog, filled from the clicked portfolio card

use super::modal::{KeyOutcome, Modal};
use crate::platform::{Dom, KeyInput};

const DEFAULT_TITLE: &str = "Package";

/// Card markup: title and pipe-delimited list of included items
pub const TITLE_ATTR: &str = "data-title";
pub const INCLUDES_ATTR: &str = "data-includes";
pub const PRICE_ATTR: &str = "data-price";

/// Content shown in the pricing dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSheet {
    pub title: String,
    pub includes: Vec<String>,
}

impl PriceSheet {
    pub fn from_attributes(title: Option<&str>, includes: Option<&str>) -> Self {
        let title = match title {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => DEFAULT_TITLE.to_string(),
        };
        let includes = includes
            .unwrap_or_default()
            .split('|')
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
        Self { title, includes }
    }

    pub fn from_card<D: Dom>(dom: &D, card: &D::Node) -> Self {
        let title = dom.attribute(card, TITLE_ATTR);
        let includes = dom.attribute(card, INCLUDES_ATTR);
        Self::from_attributes(title.as_deref(), includes.as_deref())
    }
}

/// Whether a portfolio card opens the pricing dialog
pub fn is_price_card<D: Dom>(dom: &D, card: &D::Node) -> bool {
    dom.attribute(card, PRICE_ATTR).as_deref() == Some("true")
}

pub struct PricingModal<D: Dom> {
    modal: Modal<D>,
    title: D::Node,
    list: D::Node,
}

impl<D: Dom> PricingModal<D> {
    pub fn new(modal: Modal<D>, title: D::Node, list: D::Node) -> Self {
        Self { modal, title, list }
    }

    /// Fill the dialog, then open it
    pub fn open_with(&mut self, sheet: &PriceSheet) {
        let dom = self.modal.dom().clone();
        dom.set_text(&self.title, &sheet.title);
        dom.clear_children(&self.list);
        for item in &sheet.includes {
            // Text only: card data never becomes markup
            if let Some(li) = dom.append_element(&self.list, "li") {
                dom.set_text(&li, item);
            }
        }
        self.modal.open();
        log::debug!("Pricing for '{}' ({} items)", sheet.title, sheet.includes.len());
    }

    /// Open from a clicked card; ignores cards without pricing
    pub fn open_for_card(&mut self, card: &D::Node) -> bool {
        let dom = self.modal.dom().clone();
        if !is_price_card(&*dom, card) {
            return false;
        }
        let sheet = PriceSheet::from_card(&*dom, card);
        self.open_with(&sheet);
        true
    }

    pub fn close(&mut self) -> bool {
        self.modal.close()
    }

    pub fn handle_key(&mut self, key: &KeyInput) -> KeyOutcome {
        self.modal.handle_key(key)
    }

    pub fn modal(&self) -> &Modal<D> {
        &self.modal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryDom, NodeId};
    use crate::ui::modal::ModalParts;
    use std::rc::Rc;

    #[test]
    fn test_sheet_defaults() {
        let sheet = PriceSheet::from_attributes(None, None);
        assert_eq!(sheet.title, "Package");
        assert!(sheet.includes.is_empty());

        let sheet = PriceSheet::from_attributes(Some(""), Some("|Hosting||SEO|"));
        assert_eq!(sheet.title, "Package");
        assert_eq!(sheet.includes, vec!["Hosting", "SEO"]);
    }

    fn pricing() -> (Rc<MemoryDom>, PricingModal<MemoryDom>, NodeId, NodeId) {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body();
        let root = dom.create(body, "div");
        let dialog = dom.create(root, "div");
        let close = dom.create(dialog, "button");
        let title = dom.create(dialog, "h3");
        let list = dom.create(dialog, "ul");
        let modal = Modal::new(
            "pricing",
            dom.clone(),
            ModalParts {
                root,
                dialog,
                close: Some(close),
            },
        );
        (dom.clone(), PricingModal::new(modal, title, list), title, list)
    }

    #[test]
    fn test_open_for_price_card() {
        let (dom, mut pricing, title, list) = pricing();
        let card = dom.create_with(
            dom.body(),
            "div",
            &[
                ("data-price", "true"),
                ("data-title", "Landing page"),
                ("data-includes", "Design|Build|<b>Launch</b>"),
            ],
        );

        assert!(pricing.open_for_card(&card));
        assert!(pricing.modal().is_active());
        assert_eq!(dom.text(title), "Landing page");
        let items: Vec<String> = dom.children(list).into_iter().map(|li| dom.text(li)).collect();
        assert_eq!(items, vec!["Design", "Build", "<b>Launch</b>"]);
        assert!(dom.children(list).iter().all(|li| dom.tag(*li) == "li"));
    }

    #[test]
    fn test_reopen_replaces_items() {
        let (dom, mut pricing, _title, list) = pricing();
        pricing.open_with(&PriceSheet::from_attributes(Some("A"), Some("1|2|3")));
        pricing.close();
        pricing.open_with(&PriceSheet::from_attributes(Some("B"), Some("4")));
        assert_eq!(dom.children(list).len(), 1);
    }

    #[test]
    fn test_card_without_price_ignored() {
        let (dom, mut pricing, _title, _list) = pricing();
        let card = dom.create_with(dom.body(), "div", &[("data-title", "Demo")]);
        assert!(!pricing.open_for_card(&card));
        assert!(!pricing.modal().is_active());
    }
}
