//! Conversion of payload values into rows of cell strings.
//!
//! A row is what a table consumer and the pretty printer both render: one
//! string per visible field, in declaration order. Records describe their
//! visible fields through [`Tabular`] (usually via the [`tabular!`] macro), and
//! each field type knows which [`Field`] category it belongs to through
//! [`IntoField`]. Scalar payloads render as a single cell.
//!
//! [`tabular!`]: crate::tabular

use std::{borrow::Cow, time::Duration};

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// A single visible field of a payload, tagged with how it is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
    Text(Cow<'a, str>),
    Int(i128),
    UInt(u128),
    /// Wall-clock time, always rendered in UTC.
    Time(DateTime<Utc>),
    Duration(Duration),
    /// Symbolic name of an enumerated type tag.
    Tag(Cow<'a, str>),
    Bool(bool),
    /// Anything else, already in its printable form.
    Other(String),
}

impl Field<'_> {
    /// Renders the field as a table cell.
    pub fn to_cell(&self) -> String {
        match self {
            Field::Text(text) => text.to_string(),
            Field::Int(value) => value.to_string(),
            Field::UInt(value) => value.to_string(),
            Field::Time(time) => time.to_rfc3339_opts(SecondsFormat::Secs, true),
            Field::Duration(duration) => humantime::format_duration(*duration).to_string(),
            Field::Tag(tag) => tag.to_string(),
            Field::Bool(value) => value.to_string(),
            Field::Other(text) => text.clone(),
        }
    }

    /// Wraps any printable value as an uncategorised field.
    pub fn display(value: &impl std::fmt::Display) -> Field<'static> {
        Field::Other(value.to_string())
    }
}

/// Types that can appear as a visible field of a tabular record.
///
/// Enumerations implement this by returning [`Field::Tag`] with the variant's
/// symbolic name.
pub trait IntoField {
    fn to_field(&self) -> Field<'_>;
}

/// Payloads that can be turned into a row of cells.
pub trait Tabular {
    /// Visible fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    /// Column titles matching [`Tabular::fields`]. Empty for scalar payloads.
    fn columns() -> Vec<&'static str>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

/// Formats a payload into its row of cells.
///
/// # Arguments
/// * `payload` - The value to format
///
/// # Returns
/// * `Vec<String>` - One cell per visible field
pub fn format_row<P: Tabular + ?Sized>(payload: &P) -> Vec<String> {
    payload.fields().iter().map(Field::to_cell).collect()
}

/// Implements [`Tabular`] for a record by listing its visible fields.
///
/// Each listed field must implement [`IntoField`]. Column titles are the
/// field names.
///
/// ```
/// use rowtree::{row::format_row, tabular};
///
/// struct Item {
///     idx: u32,
///     name: String,
/// }
/// tabular!(Item { idx, name });
///
/// let item = Item { idx: 7, name: "seven".into() };
/// assert_eq!(format_row(&item), vec!["7", "seven"]);
/// ```
#[macro_export]
macro_rules! tabular {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::row::Tabular for $ty {
            fn fields(&self) -> Vec<$crate::row::Field<'_>> {
                vec![$($crate::row::IntoField::to_field(&self.$field)),*]
            }

            fn columns() -> Vec<&'static str> {
                vec![$(stringify!($field)),*]
            }
        }
    };
}

impl IntoField for String {
    fn to_field(&self) -> Field<'_> {
        Field::Text(Cow::Borrowed(self.as_str()))
    }
}

impl IntoField for str {
    fn to_field(&self) -> Field<'_> {
        Field::Text(Cow::Borrowed(self))
    }
}

impl IntoField for &str {
    fn to_field(&self) -> Field<'_> {
        Field::Text(Cow::Borrowed(*self))
    }
}

impl IntoField for Cow<'_, str> {
    fn to_field(&self) -> Field<'_> {
        Field::Text(Cow::Borrowed(self.as_ref()))
    }
}

impl IntoField for bool {
    fn to_field(&self) -> Field<'_> {
        Field::Bool(*self)
    }
}

impl IntoField for Duration {
    fn to_field(&self) -> Field<'_> {
        Field::Duration(*self)
    }
}

impl<Tz: TimeZone> IntoField for DateTime<Tz> {
    fn to_field(&self) -> Field<'_> {
        Field::Time(self.with_timezone(&Utc))
    }
}

impl<T: IntoField> IntoField for Option<T> {
    fn to_field(&self) -> Field<'_> {
        match self {
            Some(value) => value.to_field(),
            None => Field::Other(String::new()),
        }
    }
}

macro_rules! signed_field {
    ($($ty:ty),*) => {$(
        impl IntoField for $ty {
            fn to_field(&self) -> Field<'_> {
                Field::Int(*self as i128)
            }
        }
    )*};
}

macro_rules! unsigned_field {
    ($($ty:ty),*) => {$(
        impl IntoField for $ty {
            fn to_field(&self) -> Field<'_> {
                Field::UInt(*self as u128)
            }
        }
    )*};
}

macro_rules! display_field {
    ($($ty:ty),*) => {$(
        impl IntoField for $ty {
            fn to_field(&self) -> Field<'_> {
                Field::display(self)
            }
        }
    )*};
}

signed_field!(i8, i16, i32, i64, i128, isize);
unsigned_field!(u8, u16, u32, u64, u128, usize);
display_field!(f32, f64, char);

// Scalars are not records: one cell holding the printable form.
macro_rules! scalar_tabular {
    ($($ty:ty),*) => {$(
        impl Tabular for $ty {
            fn fields(&self) -> Vec<Field<'_>> {
                vec![IntoField::to_field(self)]
            }
        }
    )*};
}

scalar_tabular!(
    String, &str, bool, char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128,
    usize
);

impl Tabular for str {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![IntoField::to_field(self)]
    }
}
