use alloc::string::String;

use crate::Style;

/// The invisible measurement proxy rendered before a size is known.
///
/// It carries only the caller's pass-through `class_name`/`style`; the wrapped component's own
/// props are withheld until the instance is measured. Hosts draw it as a single element with
/// [`Placeholder::computed_style`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placeholder {
    pub class_name: Option<String>,
    pub style: Option<Style>,
}

impl Placeholder {
    pub fn new(class_name: Option<&str>, style: Option<&Style>) -> Self {
        Self {
            class_name: class_name.map(String::from),
            style: style.cloned(),
        }
    }

    /// Declarations that make the element fill its parent without painting anything.
    pub fn stretch_style() -> Style {
        Style::new()
            .with("height", "100%")
            .with("position", "relative")
            .with("visibility", "hidden")
            .with("width", "100%")
    }

    /// The stretch declarations overlaid with the caller's style.
    pub fn computed_style(&self) -> Style {
        match &self.style {
            Some(style) => Self::stretch_style().merged(style),
            None => Self::stretch_style(),
        }
    }

    /// Whether only the intrinsic stretch styling is present.
    pub fn is_bare(&self) -> bool {
        self.class_name.is_none() && self.style.is_none()
    }
}
