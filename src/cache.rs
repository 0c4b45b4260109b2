use alloc::{collections::BTreeMap, string::String};

use crate::{parameter::Parameter, utils::thread_safety::RcThreadSafety};

/// Introspected parameters by cache key, see [`crate::Symbol::cache_key`]
pub type Reflected = BTreeMap<String, RcThreadSafety<[Parameter]>>;

#[derive(Default)]
pub(crate) struct Cache {
    reflected: Reflected,
    changed: bool,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            reflected: BTreeMap::new(),
            changed: false,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, key: &str) -> Option<RcThreadSafety<[Parameter]>> {
        self.reflected.get(key).cloned()
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: String, parameters: RcThreadSafety<[Parameter]>) {
        self.reflected.insert(key, parameters);
        self.changed = true;
    }

    #[inline]
    #[must_use]
    pub(crate) fn reflected(&self) -> Reflected {
        self.reflected.clone()
    }

    /// Replaces all entries, the imported state counts as unchanged
    #[inline]
    pub(crate) fn replace(&mut self, reflected: Reflected) {
        self.reflected = reflected;
        self.changed = false;
    }

    #[inline]
    #[must_use]
    pub(crate) const fn changed(&self) -> bool {
        self.changed
    }
}

#[cfg(test)]
mod tests {
    use super::{Cache, Reflected};
    use crate::Parameter;

    use alloc::{string::ToString as _, vec};

    #[test]
    fn test_insert_marks_changed() {
        let mut cache = Cache::new();
        assert!(!cache.changed());
        assert!(cache.get("class:Baz.new").is_none());

        cache.insert("class:Baz.new".to_string(), vec![Parameter::new("value")].into());

        assert!(cache.changed());
        assert_eq!(cache.get("class:Baz.new").unwrap()[0].name, "value");
    }

    #[test]
    fn test_replace_resets_changed() {
        let mut cache = Cache::new();
        cache.insert("class:Baz.new".to_string(), vec![Parameter::new("value")].into());
        let exported = cache.reflected();

        let mut imported = Cache::new();
        imported.replace(exported);
        assert!(!imported.changed());
        assert!(imported.get("class:Baz.new").is_some());

        imported.replace(Reflected::new());
        assert!(imported.get("class:Baz.new").is_none());
    }
}
