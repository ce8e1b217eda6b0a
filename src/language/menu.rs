//! Language menu layout

use super::{LanguageId, LanguageRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item { id: LanguageId, label: String },
    /// Sub-menu holding every language starting with the same letter
    Group { label: String, items: Vec<MenuEntry> },
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Item { label, .. } | MenuEntry::Group { label, .. } => label,
        }
    }
}

/// Menu entries in the registry's presentation order
///
/// The compact layout folds languages sharing a first letter into one
/// sub-menu; letters with a single language stay top level.
pub fn build(registry: &LanguageRegistry, compact: bool) -> Vec<MenuEntry> {
    let items = registry.iter().map(|def| MenuEntry::Item {
        id: def.id,
        label: def.short_name.clone(),
    });
    if !compact {
        return items.collect();
    }

    let mut entries: Vec<MenuEntry> = Vec::new();
    for item in items {
        let initial = first_letter(item.label());
        match entries.last_mut() {
            Some(MenuEntry::Group { label, items }) if *label == initial => items.push(item),
            Some(last @ MenuEntry::Item { .. }) if first_letter(last.label()) == initial => {
                let previous = std::mem::replace(
                    last,
                    MenuEntry::Group {
                        label: initial,
                        items: Vec::new(),
                    },
                );
                if let MenuEntry::Group { items, .. } = last {
                    items.push(previous);
                    items.push(item);
                }
            }
            _ => entries.push(item),
        }
    }
    entries
}

fn first_letter(label: &str) -> String {
    label
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted() -> LanguageRegistry {
        let mut registry = LanguageRegistry::builtin();
        registry.sort_alphabetically();
        registry
    }

    #[test]
    fn test_flat_menu_lists_every_language() {
        let registry = sorted();
        let menu = build(&registry, false);
        assert_eq!(menu.len(), registry.count());
        assert!(menu.iter().all(|e| matches!(e, MenuEntry::Item { .. })));
        assert_eq!(menu[0].label(), "Bash");
    }

    #[test]
    fn test_compact_menu_groups_by_letter() {
        let registry = sorted();
        let menu = build(&registry, true);

        let c = menu.iter().find(|e| e.label() == "C").unwrap();
        let MenuEntry::Group { items, .. } = c else {
            panic!("expected a group for C");
        };
        let labels: Vec<&str> = items.iter().map(MenuEntry::label).collect();
        assert_eq!(labels, ["C", "C++", "CSS"]);

        // Single language under its letter stays an item
        assert!(matches!(
            menu.iter().find(|e| e.label() == "Bash"),
            Some(MenuEntry::Item { .. })
        ));

        let total: usize = menu
            .iter()
            .map(|e| match e {
                MenuEntry::Item { .. } => 1,
                MenuEntry::Group { items, .. } => items.len(),
            })
            .sum();
        assert_eq!(total, registry.count());
    }
}
