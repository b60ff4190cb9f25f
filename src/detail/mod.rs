use crate::bindings::{bind_image, ImageRequest};
use crate::models::Property;
use std::sync::Arc;

/// Display state for a single selected property
pub struct DetailViewModel {
    selected_property: Arc<Property>,
}

impl DetailViewModel {
    pub fn new(property: Arc<Property>) -> Self {
        Self {
            selected_property: property,
        }
    }

    pub fn selected_property(&self) -> &Arc<Property> {
        &self.selected_property
    }

    pub fn image(&self) -> Option<ImageRequest> {
        bind_image(Some(self.selected_property.img_src_url.as_str()))
    }

    /// `$450,000` for sale, `$1,500/month` for rent
    pub fn display_price(&self) -> String {
        let price = format_dollars(self.selected_property.price);
        if self.selected_property.is_rental() {
            format!("{}/month", price)
        } else {
            price
        }
    }

    pub fn display_type(&self) -> String {
        let kind = if self.selected_property.is_rental() {
            "Rent"
        } else {
            "Sale"
        };
        format!("For {}", kind)
    }
}

/// Whole dollars with comma-grouped thousands
fn format_dollars(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("$-{}", grouped)
    } else {
        format!("${}", grouped)
    }
}
