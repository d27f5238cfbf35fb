//! The pending, not yet ordered selection of a single session.
//!
//! A cart never touches the store by itself. Callers look menu items up and
//! hand them in, so every subtotal here is `quantity × price` of the item as
//! it was when the line was last set or repriced.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::entities::menu_item;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CartState {
    Empty,
    Populated,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CartLine {
    pub item_id: i32,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
}

impl CartLine {
    fn new(item: &menu_item::Model, quantity: u32) -> Self {
        CartLine {
            item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            subtotal: item.price * Decimal::from(quantity),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the line for `item`; a quantity of zero drops it instead.
    pub fn set_quantity(&mut self, item: &menu_item::Model, quantity: u32) {
        if quantity == 0 {
            self.remove(item.id);
            return;
        }
        let line = CartLine::new(item, quantity);
        match self.lines.iter_mut().find(|l| l.item_id == item.id) {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    /// Recomputes the line for `item` from its current price, keeping the quantity.
    pub fn reprice(&mut self, item: &menu_item::Model) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.item_id == item.id) {
            *existing = CartLine::new(item, existing.quantity);
        }
    }

    pub fn remove(&mut self, item_id: i32) {
        self.lines.retain(|l| l.item_id != item_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn item_ids(&self) -> Vec<i32> {
        self.lines.iter().map(|l| l.item_id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn state(&self) -> CartState {
        if self.is_empty() {
            CartState::Empty
        } else {
            CartState::Populated
        }
    }

    pub fn total(&self) -> Decimal {
        self.lines.iter().map(|l| l.subtotal).sum()
    }
}
