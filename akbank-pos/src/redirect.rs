//! Self-submitting 3-D Secure redirect page.
//!
//! In the 3-D Secure model the card holder's browser posts the signed form
//! directly to the gateway. [`RedirectForm`] holds the target endpoint and the
//! ordered fields; it can be handed to a frontend as JSON, or rendered into an
//! HTML page that submits itself on load.
//!
//! ```
//! use akbank_pos::{form::FormEncoding, redirect::RedirectForm};
//!
//! let form = RedirectForm::new(
//!     "https://virtualpospaymentgatewaypre.akbank.com/securepay",
//!     FormEncoding::from_pairs([("txnCode", "3000"), ("hash", "abc=")]),
//! );
//! let html = form.to_html();
//! assert!(html.starts_with("<!DOCTYPE html>"));
//! assert!(html.contains(r#"<input type="hidden" name="txnCode" value="3000">"#));
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::form::FormEncoding;

const SUBMIT_SCRIPT: &str = "function submitonload() {document.payment.submit();\
document.getElementById('button').remove();\
document.getElementById('body').insertAdjacentHTML(\"beforeend\", \"Lütfen bekleyiniz...\");}";

const BODY_STYLE: &str = "text-align:center;margin:10px;font-family:Arial;font-weight:bold;";

/// Target endpoint and signed fields of a 3-D Secure browser post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectForm {
    /// Gateway 3-D Secure URL the form posts to.
    pub endpoint: String,
    /// HTTP method, always `POST`.
    pub method: &'static str,
    /// Form fields in signing order, `hash` last.
    #[serde(serialize_with = "ordered_fields")]
    pub fields: FormEncoding,
}

impl RedirectForm {
    /// Creates a redirect form posting `fields` to `endpoint`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, fields: FormEncoding) -> Self {
        Self { endpoint: endpoint.into(), method: "POST", fields }
    }

    /// Renders the self-submitting page.
    #[must_use]
    pub fn to_markup(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta http-equiv="Content-Type" content="text/html; charset=utf-8";
                    script type="text/javascript" { (PreEscaped(SUBMIT_SCRIPT)) }
                }
                body onload="submitonload();" id="body" style=(BODY_STYLE) {
                    form action=(self.endpoint) method="post" name="payment" {
                        @for (name, value) in self.fields.iter() {
                            input type="hidden" name=(name) value=(value);
                        }
                        input type="submit" value="Gönder" id="button";
                    }
                }
            }
        }
    }

    /// Renders the page as an HTML string.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.to_markup().into_string()
    }

    /// Renders the page and returns it base64-encoded.
    #[must_use]
    pub fn encode(&self) -> String {
        STANDARD.encode(self.to_html())
    }
}

fn ordered_fields<S: Serializer>(fields: &FormEncoding, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}
