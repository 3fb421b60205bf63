use bigdecimal::BigDecimal;

use super::catalog::Product;

/// One product entry in the cart.
///
/// `unit_price` is a snapshot taken when the product was added; later catalog
/// price changes do not affect lines already in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
    pub image_url: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// In-memory cart. Lives for the session only; there is no persistence.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`: a new line with quantity 1, or an
    /// increment if the product already has a line.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity += 1;
            return;
        }
        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price.clone(),
            quantity: 1,
            image_url: product.image_url.clone(),
        });
    }

    /// Sets the quantity of a line. Zero or negative removes the line;
    /// unknown product ids are a no-op.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i32) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of `unit_price × quantity` over all lines, scaled to 2 fraction
    /// digits.
    pub fn total(&self) -> BigDecimal {
        let sum: BigDecimal = self.lines.iter().map(CartLine::subtotal).sum();
        sum.with_scale_round(2, bigdecimal::RoundingMode::HalfUp)
    }

    fn line_mut(&mut self, product_id: i64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.product_id == product_id)
    }
}
