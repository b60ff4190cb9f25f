//! Mappings from observable values to what a widget should display.
//!
//! Every binding is a pure function. Returning `None` means "leave the widget
//! as it is".

use crate::models::Property;
use crate::overview::{FetchStatus, ListUpdate, PhotoGridAdapter};
use std::sync::Arc;
use tracing::warn;
use url::{ParseError, Url};

/// Drawables the views can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    LoadingAnimation,
    BrokenImage,
    ConnectionError,
}

/// What to hand the image loader for one image view
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub uri: Url,
    pub placeholder: Glyph,
    pub error: Glyph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIcon {
    pub visible: bool,
    pub glyph: Option<Glyph>,
}

/// Rewrite an image URL to `https`, keeping everything but the scheme.
/// Scheme-less URLs (`example.com/a.jpg`) are read as host plus path.
pub fn secure_image_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let parsed = match Url::parse(raw) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            let prefix = if raw.starts_with("//") { "https:" } else { "https://" };
            Url::parse(&format!("{}{}", prefix, raw))
        }
        other => other,
    };

    let mut url = match parsed {
        Ok(url) => url,
        Err(e) => {
            warn!("Ignoring unusable image URL {:?}: {}", raw, e);
            return None;
        }
    };
    if url.set_scheme("https").is_err() {
        warn!("Ignoring image URL {:?} with scheme {:?}", raw, url.scheme());
        return None;
    }
    Some(url)
}

pub fn bind_image(img_url: Option<&str>) -> Option<ImageRequest> {
    let uri = secure_image_url(img_url?)?;
    Some(ImageRequest {
        uri,
        placeholder: Glyph::LoadingAnimation,
        error: Glyph::BrokenImage,
    })
}

pub fn bind_status(status: Option<FetchStatus>) -> Option<StatusIcon> {
    let icon = match status? {
        FetchStatus::Loading => StatusIcon {
            visible: true,
            glyph: Some(Glyph::LoadingAnimation),
        },
        FetchStatus::Error => StatusIcon {
            visible: true,
            glyph: Some(Glyph::ConnectionError),
        },
        FetchStatus::Done => StatusIcon {
            visible: false,
            glyph: None,
        },
    };
    Some(icon)
}

/// Forward the property list to the grid adapter unchanged
pub fn bind_list(adapter: &mut PhotoGridAdapter, data: Option<&[Arc<Property>]>) -> Vec<ListUpdate> {
    adapter.submit_list(data.map(|list| list.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_gets_https() {
        let request = bind_image(Some("example.com/a.jpg")).unwrap();
        assert_eq!(request.uri.as_str(), "https://example.com/a.jpg");
        assert_eq!(request.placeholder, Glyph::LoadingAnimation);
        assert_eq!(request.error, Glyph::BrokenImage);
    }

    #[test]
    fn insecure_scheme_is_replaced() {
        let url = secure_image_url("http://mars.jpl.nasa.gov/msl-raw-images/x.JPG").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.as_str(), "https://mars.jpl.nasa.gov/msl-raw-images/x.JPG");
    }

    #[test]
    fn secure_url_is_kept() {
        let url = secure_image_url("https://example.com/a.jpg?size=2").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.jpg?size=2");
    }

    #[test]
    fn url_in_query_does_not_replace_host() {
        let url = secure_image_url("example.com/img?src=http://evil.test/x.jpg").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.as_str(), "https://example.com/img?src=http://evil.test/x.jpg");

        let url = secure_image_url("http://example.com/img?src=http://evil.test/x.jpg").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn protocol_relative_url_gets_https() {
        let url = secure_image_url("//example.com/a.jpg").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.jpg");
    }

    #[test]
    fn non_web_scheme_binds_nothing() {
        assert!(secure_image_url("mailto:someone@example.com").is_none());
    }

    #[test]
    fn missing_or_empty_url_binds_nothing() {
        assert!(bind_image(None).is_none());
        assert!(bind_image(Some("")).is_none());
        assert!(bind_image(Some("http://")).is_none());
    }

    #[test]
    fn status_icon_per_state() {
        assert_eq!(
            bind_status(Some(FetchStatus::Loading)),
            Some(StatusIcon { visible: true, glyph: Some(Glyph::LoadingAnimation) })
        );
        assert_eq!(
            bind_status(Some(FetchStatus::Error)),
            Some(StatusIcon { visible: true, glyph: Some(Glyph::ConnectionError) })
        );
        assert_eq!(
            bind_status(Some(FetchStatus::Done)),
            Some(StatusIcon { visible: false, glyph: None })
        );
        assert_eq!(bind_status(None), None);
    }

    #[test]
    fn list_is_forwarded_to_adapter() {
        let list = vec![Arc::new(Property {
            id: 1,
            img_src_url: "example.com/1.jpg".to_string(),
            property_type: "rent".to_string(),
            price: 10.0,
        })];
        let mut adapter = PhotoGridAdapter::new();

        let updates = bind_list(&mut adapter, Some(list.as_slice()));
        assert_eq!(updates.len(), 1);
        assert!(Arc::ptr_eq(adapter.get_item(0).unwrap(), &list[0]));

        bind_list(&mut adapter, None);
        assert_eq!(adapter.item_count(), 0);
    }
}
