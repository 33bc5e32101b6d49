use core::str::FromStr;

use crate::qmap::repr::Point;

/// Typed read access to a single property value.
///
/// Every accessor yields `None` when the property is missing or when its
/// text does not hold the requested type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyView<'a> {
    value: Option<&'a str>,
}

impl<'a> PropertyView<'a> {
    pub fn new(value: Option<&'a str>) -> Self {
        Self { value }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn as_str(&self) -> Option<&'a str> {
        self.value
    }

    pub fn as_str_or(&self, default: &'a str) -> &'a str {
        self.value.unwrap_or(default)
    }

    pub fn parse<T: FromStr>(&self) -> Option<T> {
        self.value.and_then(|text| text.trim().parse().ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.parse()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.parse()
    }

    /// Accepts `1`/`0` as well as `true`/`false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self.value?.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        }
    }

    /// Three whitespace-separated numbers, e.g. `origin` or `angles`.
    pub fn as_vec3(&self) -> Option<Point> {
        let mut parts = self.value?.split_whitespace();
        let mut next = || parts.next()?.parse::<f64>().ok();
        let point = Point::new(next()?, next()?, next()?);

        if parts.next().is_some() {
            None
        } else {
            Some(point)
        }
    }
}
