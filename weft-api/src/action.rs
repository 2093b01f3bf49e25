//! Response directives and their wire codec.
//!
//! A response body is a `;`-separated list of directives. Each directive is a
//! `,`-separated list whose first field is the directive code:
//!
//! ```text
//! 0                 no action
//! 1[,path]          reload window (optionally navigating to path)
//! 2,id,id,...       re-render the listed components
//! 3,id              focus a component
//! ```

use crate::protocol::{DIRECTIVE_SEP, FIELD_SEP, codes};
use crate::{ComponentId, ProtocolError};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters that would break directive framing inside a reload path.
const PATH_ESCAPE: &AsciiSet = &CONTROLS.add(b'%').add(b',').add(b';');

/// A single instruction from the server to the client, applied in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAction {
    /// Successful no-op. Distinguishes "nothing to do" from a failed exchange.
    NoAction,
    /// Reload the page, or navigate to the given path.
    ReloadWindow(Option<String>),
    /// Re-render the listed components.
    MarkDirty(Vec<ComponentId>),
    /// Move keyboard focus to a component.
    FocusComponent(ComponentId),
}

impl ResponseAction {
    pub const fn code(&self) -> u8 {
        match self {
            ResponseAction::NoAction => codes::NO_ACTION,
            ResponseAction::ReloadWindow(_) => codes::RELOAD_WINDOW,
            ResponseAction::MarkDirty(_) => codes::MARK_DIRTY,
            ResponseAction::FocusComponent(_) => codes::FOCUS_COMPONENT,
        }
    }

    fn encode_into(&self, out: &mut String) {
        out.push_str(&self.code().to_string());
        match self {
            ResponseAction::NoAction | ResponseAction::ReloadWindow(None) => {}
            ResponseAction::ReloadWindow(Some(path)) => {
                out.push(FIELD_SEP);
                out.extend(utf8_percent_encode(path, PATH_ESCAPE));
            }
            ResponseAction::MarkDirty(ids) => {
                for id in ids {
                    out.push(FIELD_SEP);
                    out.push_str(&id.to_string());
                }
            }
            ResponseAction::FocusComponent(id) => {
                out.push(FIELD_SEP);
                out.push_str(&id.to_string());
            }
        }
    }

    /// Decode one directive (the text between two `;`).
    pub fn decode(directive: &str) -> Result<Self, ProtocolError> {
        let mut fields = directive.split(FIELD_SEP);
        let head = fields.next().unwrap_or_default();
        let code = head
            .trim()
            .parse::<u8>()
            .map_err(|_| ProtocolError::UnknownCode(head.to_string()))?;

        match code {
            codes::NO_ACTION => Ok(ResponseAction::NoAction),
            codes::RELOAD_WINDOW => {
                let path = fields
                    .next()
                    .filter(|p| !p.is_empty())
                    .map(|p| percent_decode_str(p).decode_utf8_lossy().into_owned());
                Ok(ResponseAction::ReloadWindow(path))
            }
            codes::MARK_DIRTY => fields
                .map(|f| {
                    f.parse::<ComponentId>()
                        .map_err(|_| ProtocolError::MalformedDirective(directive.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ResponseAction::MarkDirty),
            codes::FOCUS_COMPONENT => fields
                .next()
                .and_then(|f| f.parse().ok())
                .map(ResponseAction::FocusComponent)
                .ok_or_else(|| ProtocolError::MalformedDirective(directive.to_string())),
            _ => Err(ProtocolError::UnknownCode(head.to_string())),
        }
    }
}

/// Encode an ordered list of directives into a response body.
///
/// An empty list encodes as a single `NoAction` so the body is never empty.
pub fn encode_actions(actions: &[ResponseAction]) -> String {
    let mut out = String::new();
    if actions.is_empty() {
        ResponseAction::NoAction.encode_into(&mut out);
        return out;
    }
    for (i, action) in actions.iter().enumerate() {
        if i > 0 {
            out.push(DIRECTIVE_SEP);
        }
        action.encode_into(&mut out);
    }
    out
}

/// Split a response body into its directives.
///
/// An empty body is a protocol violation: the server always sends at least
/// one directive. Per-directive decoding is left to the caller so one bad
/// directive does not hide the others.
pub fn split_directives(body: &str) -> Result<Vec<&str>, ProtocolError> {
    if body.trim().is_empty() {
        return Err(ProtocolError::EmptyResponse);
    }
    Ok(body.split(DIRECTIVE_SEP).collect())
}

/// Decode a full response body, failing on the first bad directive.
pub fn decode_actions(body: &str) -> Result<Vec<ResponseAction>, ProtocolError> {
    split_directives(body)?
        .into_iter()
        .map(ResponseAction::decode)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_dirty_round_trip_preserves_order() {
        let action = ResponseAction::MarkDirty(vec![ComponentId(3), ComponentId(7), ComponentId(9)]);
        let body = encode_actions(std::slice::from_ref(&action));
        assert_eq!(body, "2,3,7,9");
        assert_eq!(decode_actions(&body), Ok(vec![action]));
    }

    #[test]
    fn empty_list_encodes_as_no_action() {
        assert_eq!(encode_actions(&[]), "0");
    }

    #[test]
    fn multiple_directives_keep_order() {
        let actions = vec![
            ResponseAction::MarkDirty(vec![ComponentId(2), ComponentId(5)]),
            ResponseAction::FocusComponent(ComponentId(5)),
            ResponseAction::ReloadWindow(Some("/app/x".to_string())),
        ];
        let body = encode_actions(&actions);
        assert_eq!(body, "2,2,5;3,5;1,/app/x");
        assert_eq!(decode_actions(&body), Ok(actions));
    }

    #[test]
    fn reload_without_path() {
        assert_eq!(encode_actions(&[ResponseAction::ReloadWindow(None)]), "1");
        assert_eq!(ResponseAction::decode("1"), Ok(ResponseAction::ReloadWindow(None)));
        assert_eq!(ResponseAction::decode("1,"), Ok(ResponseAction::ReloadWindow(None)));
    }

    #[test]
    fn reload_path_with_separators_is_escaped() {
        let action = ResponseAction::ReloadWindow(Some("/a;b,c%d".to_string()));
        let body = encode_actions(std::slice::from_ref(&action));
        assert_eq!(body, "1,/a%3Bb%2Cc%25d");
        assert_eq!(split_directives(&body).unwrap().len(), 1);
        assert_eq!(decode_actions(&body), Ok(vec![action]));
    }

    #[test]
    fn empty_body_is_protocol_violation() {
        assert_eq!(decode_actions(""), Err(ProtocolError::EmptyResponse));
        assert_eq!(decode_actions("  "), Err(ProtocolError::EmptyResponse));
    }

    #[test]
    fn unknown_code_is_reported() {
        assert_eq!(
            decode_actions("7,1"),
            Err(ProtocolError::UnknownCode("7".to_string()))
        );
        assert_eq!(
            ResponseAction::decode("x"),
            Err(ProtocolError::UnknownCode("x".to_string()))
        );
    }

    #[test]
    fn malformed_directives() {
        assert!(matches!(
            ResponseAction::decode("3"),
            Err(ProtocolError::MalformedDirective(_))
        ));
        assert!(matches!(
            ResponseAction::decode("2,4,oops"),
            Err(ProtocolError::MalformedDirective(_))
        ));
    }

    #[test]
    fn mark_dirty_with_no_ids_decodes_to_empty_list() {
        assert_eq!(ResponseAction::decode("2"), Ok(ResponseAction::MarkDirty(vec![])));
    }
}
