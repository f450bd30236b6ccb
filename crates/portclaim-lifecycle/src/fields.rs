//! Required-field bookkeeping shared by every block kind

/// Accumulates the names of unset required fields
#[derive(Debug, Default)]
pub(crate) struct MissingFields {
    fields: Vec<String>,
}

impl MissingFields {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records `name` unless `present`
    pub(crate) fn check(&mut self, name: &str, present: bool) {
        if !present {
            self.fields.push(name.to_string());
        }
    }

    /// Records the missing fields of an owned child under `prefix`
    pub(crate) fn nested(&mut self, prefix: &str, child: Vec<String>) {
        self.fields
            .extend(child.into_iter().map(|field| format!("{prefix}.{field}")));
    }

    pub(crate) fn into_fields(self) -> Vec<String> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_prefix() {
        let mut missing = MissingFields::new();
        missing.check("speed", false);
        missing.check("ims_id", true);
        missing.nested("saps[1]", vec!["port".into(), "vlan".into()]);
        assert_eq!(
            missing.into_fields(),
            vec!["speed", "saps[1].port", "saps[1].vlan"]
        );
    }
}
