use serde::{Deserialize, Serialize};

use super::node::Node;

/// Postal address of a supplier, customer or fiscal representative.
///
/// The invoice schema allows either a detailed or a simple address. Anything
/// else, including a missing address, is [`Address::Absent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Address {
    Detailed(DetailedAddress),
    Simple(SimpleAddress),
    #[default]
    Absent,
}

/// Address split into street, house number and building parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedAddress {
    pub country_code: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub street_name: Option<String>,
    /// Kind of public place, e.g. "utca", "tér".
    pub public_place_category: Option<String>,
    /// House number.
    pub number: Option<String>,
    pub building: Option<String>,
    pub staircase: Option<String>,
    pub floor: Option<String>,
    pub door: Option<String>,
    /// Land registry lot number (helyrajzi szám).
    pub lot_number: Option<String>,
}

/// Address with a single free-text detail line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleAddress {
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub additional_address_detail: String,
}

impl Address {
    /// Build the tagged variant from a decoded address element.
    ///
    /// A `detailedAddress` child wins over a `simpleAddress` child. A child
    /// that is not an element mapping makes the address [`Address::Absent`].
    pub fn from_node(node: Option<&Node>) -> Self {
        let Some(node) = node else {
            return Self::Absent;
        };
        if let Some(detailed) = node.get("detailedAddress") {
            return match detailed {
                Node::Mapping(_) => Self::Detailed(DetailedAddress::from_node(detailed)),
                _ => Self::Absent,
            };
        }
        if let Some(simple) = node.get("simpleAddress") {
            return match simple {
                Node::Mapping(_) => Self::Simple(SimpleAddress::from_node(simple)),
                _ => Self::Absent,
            };
        }
        Self::Absent
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl DetailedAddress {
    fn from_node(node: &Node) -> Self {
        Self {
            country_code: required(node, "countryCode"),
            region: optional(node, "region"),
            postal_code: required(node, "postalCode"),
            city: required(node, "city"),
            street_name: optional(node, "streetName"),
            public_place_category: optional(node, "publicPlaceCategory"),
            number: optional(node, "number"),
            building: optional(node, "building"),
            staircase: optional(node, "staircase"),
            floor: optional(node, "floor"),
            door: optional(node, "door"),
            lot_number: optional(node, "lotNumber"),
        }
    }
}

impl SimpleAddress {
    fn from_node(node: &Node) -> Self {
        Self {
            country_code: optional(node, "countryCode"),
            region: optional(node, "region"),
            postal_code: required(node, "postalCode"),
            city: required(node, "city"),
            additional_address_detail: required(node, "additionalAddressDetail"),
        }
    }
}

// Empty elements count as missing.
fn optional(node: &Node, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Node::text)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn required(node: &Node, key: &str) -> String {
    optional(node, key).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detailed_wins_over_simple() {
        let node = Node::from_iter([
            (
                "detailedAddress",
                Node::from_iter([("city", Node::from("Budapest")), ("door", Node::from(""))]),
            ),
            ("simpleAddress", Node::from_iter([("city", Node::from("Pécs"))])),
        ]);
        let Address::Detailed(d) = Address::from_node(Some(&node)) else {
            panic!("expected detailed address");
        };
        assert_eq!(d.city, "Budapest");
        assert_eq!(d.door, None);
    }

    #[test]
    fn unrecognized_shapes_are_absent() {
        assert!(Address::from_node(None).is_absent());
        assert!(Address::from_node(Some(&Node::empty())).is_absent());
        let scalar = Node::from_iter([("simpleAddress", Node::from("Budapest"))]);
        assert!(Address::from_node(Some(&scalar)).is_absent());
    }
}
