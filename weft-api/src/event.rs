//! Client events: the decoded form of an event submission request.

use crate::protocol::params;
use crate::{ComponentId, ProtocolError};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Kinds of DOM events the runtime can forward to the server.
///
/// The discriminant is the integer sent in the `et` form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Click = 0,
    DblClick = 1,
    MouseDown = 2,
    MouseMove = 3,
    MouseOver = 4,
    MouseOut = 5,
    MouseUp = 6,
    KeyDown = 7,
    KeyPress = 8,
    KeyUp = 9,
    Blur = 10,
    Change = 11,
    Focus = 12,
}

impl EventType {
    pub const ALL: [EventType; 13] = [
        EventType::Click,
        EventType::DblClick,
        EventType::MouseDown,
        EventType::MouseMove,
        EventType::MouseOver,
        EventType::MouseOut,
        EventType::MouseUp,
        EventType::KeyDown,
        EventType::KeyPress,
        EventType::KeyUp,
        EventType::Blur,
        EventType::Change,
        EventType::Focus,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// DOM attribute that captures this event (e.g. `onclick`).
    pub const fn attr_name(self) -> &'static str {
        match self {
            EventType::Click => "onclick",
            EventType::DblClick => "ondblclick",
            EventType::MouseDown => "onmousedown",
            EventType::MouseMove => "onmousemove",
            EventType::MouseOver => "onmouseover",
            EventType::MouseOut => "onmouseout",
            EventType::MouseUp => "onmouseup",
            EventType::KeyDown => "onkeydown",
            EventType::KeyPress => "onkeypress",
            EventType::KeyUp => "onkeyup",
            EventType::Blur => "onblur",
            EventType::Change => "onchange",
            EventType::Focus => "onfocus",
        }
    }
}

bitflags! {
    /// Modifier keys held during an event, sent as a bitmask in `mk`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModKeys: u8 {
        const ALT = 1;
        const CTRL = 2;
        const META = 4;
        const SHIFT = 8;
    }
}

/// Mouse button reported with pointer events (DOM `event.button`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

/// Pointer coordinates: window-relative and component-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub window: (i32, i32),
    pub component: (i32, i32),
}

/// Raw event submission form, exactly as it travels over the wire.
///
/// Every field is an optional string: decoding into [`Event`] is lenient so a
/// garbled optional field degrades to "absent" instead of failing the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForm {
    #[serde(rename = "et", default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(rename = "cid", default, skip_serializing_if = "Option::is_none")]
    pub comp_id: Option<String>,
    #[serde(rename = "cval", default, skip_serializing_if = "Option::is_none")]
    pub comp_value: Option<String>,
    #[serde(rename = "fcid", default, skip_serializing_if = "Option::is_none")]
    pub focused_comp_id: Option<String>,
    #[serde(rename = "mwx", default, skip_serializing_if = "Option::is_none")]
    pub mouse_wx: Option<String>,
    #[serde(rename = "mwy", default, skip_serializing_if = "Option::is_none")]
    pub mouse_wy: Option<String>,
    #[serde(rename = "mx", default, skip_serializing_if = "Option::is_none")]
    pub mouse_x: Option<String>,
    #[serde(rename = "my", default, skip_serializing_if = "Option::is_none")]
    pub mouse_y: Option<String>,
    #[serde(rename = "mb", default, skip_serializing_if = "Option::is_none")]
    pub mouse_btn: Option<String>,
    #[serde(rename = "mk", default, skip_serializing_if = "Option::is_none")]
    pub mod_keys: Option<String>,
    #[serde(rename = "kc", default, skip_serializing_if = "Option::is_none")]
    pub key_code: Option<String>,
}

/// Component re-render request form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderForm {
    #[serde(rename = "cid", default, skip_serializing_if = "Option::is_none")]
    pub comp_id: Option<String>,
}

impl RenderForm {
    pub fn new(id: ComponentId) -> Self {
        Self {
            comp_id: Some(id.to_string()),
        }
    }

    pub fn component_id(&self) -> Result<ComponentId, ProtocolError> {
        required_id(&self.comp_id, params::COMP_ID)
    }
}

/// A decoded client event. Lives for a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventType,
    pub target: ComponentId,
    pub value: Option<String>,
    pub focused: Option<ComponentId>,
    pub pointer: Option<Pointer>,
    pub button: Option<MouseButton>,
    pub mod_keys: ModKeys,
    pub key_code: Option<u32>,
}

impl Event {
    /// Create a bare event with no payload or metadata.
    pub fn new(kind: EventType, target: ComponentId) -> Self {
        Self {
            kind,
            target,
            value: None,
            focused: None,
            pointer: None,
            button: None,
            mod_keys: ModKeys::empty(),
            key_code: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_focused(mut self, focused: ComponentId) -> Self {
        self.focused = Some(focused);
        self
    }

    /// Decode an event from its wire form.
    ///
    /// Only the event type and target id are required. Optional fields that
    /// fail to parse are treated as absent.
    pub fn from_form(form: &EventForm) -> Result<Self, ProtocolError> {
        let code = form
            .event_type
            .as_deref()
            .ok_or(ProtocolError::MissingField(params::EVENT_TYPE))?;
        let kind = code
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(EventType::from_code)
            .ok_or_else(|| ProtocolError::InvalidField {
                field: params::EVENT_TYPE,
                value: code.to_string(),
            })?;
        let target = required_id(&form.comp_id, params::COMP_ID)?;

        let pointer = match (
            parse_opt::<i32>(&form.mouse_wx),
            parse_opt::<i32>(&form.mouse_wy),
        ) {
            (Some(wx), Some(wy)) => Some(Pointer {
                window: (wx, wy),
                component: (
                    parse_opt(&form.mouse_x).unwrap_or(wx),
                    parse_opt(&form.mouse_y).unwrap_or(wy),
                ),
            }),
            _ => None,
        };

        Ok(Self {
            kind,
            target,
            value: form.comp_value.clone(),
            focused: parse_opt(&form.focused_comp_id),
            pointer,
            button: parse_opt::<u8>(&form.mouse_btn).and_then(MouseButton::from_code),
            mod_keys: parse_opt::<u8>(&form.mod_keys)
                .map(ModKeys::from_bits_truncate)
                .unwrap_or_default(),
            key_code: parse_opt(&form.key_code),
        })
    }

    /// Encode this event into its wire form.
    pub fn to_form(&self) -> EventForm {
        EventForm {
            event_type: Some(self.kind.code().to_string()),
            comp_id: Some(self.target.to_string()),
            comp_value: self.value.clone(),
            focused_comp_id: self.focused.map(|id| id.to_string()),
            mouse_wx: self.pointer.map(|p| p.window.0.to_string()),
            mouse_wy: self.pointer.map(|p| p.window.1.to_string()),
            mouse_x: self.pointer.map(|p| p.component.0.to_string()),
            mouse_y: self.pointer.map(|p| p.component.1.to_string()),
            mouse_btn: self.button.map(|b| b.code().to_string()),
            mod_keys: (!self.mod_keys.is_empty()).then(|| self.mod_keys.bits().to_string()),
            key_code: self.key_code.map(|k| k.to_string()),
        }
    }
}

fn required_id(raw: &Option<String>, field: &'static str) -> Result<ComponentId, ProtocolError> {
    let raw = raw.as_deref().ok_or(ProtocolError::MissingField(field))?;
    raw.parse().map_err(|_| ProtocolError::InvalidField {
        field,
        value: raw.to_string(),
    })
}

fn parse_opt<T: std::str::FromStr>(raw: &Option<String>) -> Option<T> {
    raw.as_deref().and_then(|s| s.trim().parse().ok())
}
