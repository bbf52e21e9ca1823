use serde::{Deserialize, Serialize};

/// A record of the lookup dataset: `prop1 = i`, `prop2 = i²`, `prop3 = √i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttrRecord {
    pub prop1: i64,
    pub prop2: i64,
    pub prop3: f64,
}

/// Attribute selector for index-building strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Prop1,
    Prop2,
    Prop3,
}

impl Attr {
    pub const ALL: [Attr; 3] = [Attr::Prop1, Attr::Prop2, Attr::Prop3];

    pub fn name(self) -> &'static str {
        match self {
            Attr::Prop1 => "prop1",
            Attr::Prop2 => "prop2",
            Attr::Prop3 => "prop3",
        }
    }
}

impl AttrRecord {
    pub fn from_index(i: u64) -> Self {
        let i = i as i64;
        Self {
            prop1: i,
            prop2: i * i,
            prop3: (i as f64).sqrt(),
        }
    }

    /// Attribute value widened to `f64` for uniform comparison.
    pub fn value(&self, attr: Attr) -> f64 {
        match attr {
            Attr::Prop1 => self.prop1 as f64,
            Attr::Prop2 => self.prop2 as f64,
            Attr::Prop3 => self.prop3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_derives_square_and_root() {
        let r = AttrRecord::from_index(9);
        assert_eq!(r.prop1, 9);
        assert_eq!(r.prop2, 81);
        assert_eq!(r.prop3, 3.0);
    }

    #[test]
    fn value_selects_attribute() {
        let r = AttrRecord::from_index(4);
        assert_eq!(r.value(Attr::Prop1), 4.0);
        assert_eq!(r.value(Attr::Prop2), 16.0);
        assert_eq!(r.value(Attr::Prop3), 2.0);
        let names: Vec<_> = Attr::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, ["prop1", "prop2", "prop3"]);
    }
}
