use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// A point on the dispatch grid. Integer coordinates, no identity.
///
/// On the wire this is always an `{x, y}` object; arrays are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub x: i64,
    pub y: i64,
}

impl Location {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LocationVisitor)
    }
}

struct LocationVisitor;

impl<'de> Visitor<'de> for LocationVisitor {
    type Value = Location;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an object with integer `x` and `y` fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Location, A::Error> {
        let mut x = None;
        let mut y = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "x" if x.is_some() => return Err(de::Error::duplicate_field("x")),
                "y" if y.is_some() => return Err(de::Error::duplicate_field("y")),
                "x" => x = Some(map.next_value::<i64>()?),
                "y" => y = Some(map.next_value::<i64>()?),
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }
        Ok(Location {
            x: x.ok_or_else(|| de::Error::missing_field("x"))?,
            y: y.ok_or_else(|| de::Error::missing_field("y"))?,
        })
    }
}

/// Euclidean distance between two grid points.
///
/// Deltas are taken in f64 so coordinates near the i64 range cannot overflow.
pub fn distance(a: Location, b: Location) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    (dx * dx + dy * dy).sqrt()
}
