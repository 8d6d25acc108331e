use std::collections::BTreeMap;

use crate::models::Section;

/// Bucket items into sections keyed by `key_fn`.
/// Sections come out sorted by the UTF-16 code units of their name, which
/// matches the order clients sorting JS strings expect; items keep their
/// input order.
pub fn group_by<T, F>(items: &[T], key_fn: F) -> Vec<Section<T>>
where
    T: Clone,
    F: Fn(&T) -> &str,
{
    let mut groups: BTreeMap<Vec<u16>, Section<T>> = BTreeMap::new();
    for item in items {
        let title = key_fn(item);
        groups
            .entry(title.encode_utf16().collect())
            .or_insert_with(|| Section {
                title: title.to_string(),
                data: Vec::new(),
            })
            .data
            .push(item.clone());
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        group: &'static str,
    }

    #[test]
    fn test_group_by_orders_groups_and_keeps_items() {
        let items = vec![
            Item { name: "item1", group: "B" },
            Item { name: "item2", group: "A" },
            Item { name: "item3", group: "B" },
        ];

        let sections = group_by(&items, |i| i.group);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "A");
        assert_eq!(sections[0].data, vec![items[1].clone()]);
        assert_eq!(sections[1].title, "B");
        assert_eq!(sections[1].data, vec![items[0].clone(), items[2].clone()]);
    }

    #[test]
    fn test_group_by_empty() {
        let items: Vec<Item> = Vec::new();
        assert!(group_by(&items, |i| i.group).is_empty());
    }

    #[test]
    fn test_group_by_orders_by_utf16_units() {
        // U+10000 is a surrogate pair (0xD800..) and sorts before U+FF21
        let items = vec![
            Item { name: "a", group: "\u{FF21}" },
            Item { name: "b", group: "\u{10000}" },
        ];

        let titles: Vec<String> = group_by(&items, |i| i.group)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["\u{10000}".to_string(), "\u{FF21}".to_string()]);
    }

    #[test]
    fn test_group_by_is_case_sensitive() {
        let items = vec![
            Item { name: "a", group: "action" },
            Item { name: "b", group: "Zed" },
        ];

        let titles: Vec<String> = group_by(&items, |i| i.group)
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Zed".to_string(), "action".to_string()]);
    }
}
