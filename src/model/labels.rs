pub type LabelName = String;

pub type LabelValue = String;

/// Pseudo-label carrying the metric name. Never rendered inside braces.
pub const METRIC_NAME_LABEL: &str = "__name__";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Label {
    name: LabelName,
    value: LabelValue,
}

impl Label {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<LabelName>,
        V: Into<LabelValue>,
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Labels of a single series, excluding the metric name. Names are unique.
///
/// Input order is kept until [`LabelSet::merge`] is called; after that the set
/// is sorted by name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelSet(Vec<Label>);

impl LabelSet {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|l| l.name == name).map(Label::value)
    }

    pub fn is_sorted(&self) -> bool {
        self.0
            .windows(2)
            .all(|pair| pair[0].name.as_bytes() <= pair[1].name.as_bytes())
    }

    /// Attaches `injected` to the set. An existing label sharing a name with an
    /// injected one is dropped first, so every injected name ends up present
    /// exactly once and with the injected value. The result is sorted by name.
    pub fn merge(&mut self, injected: &[Label]) {
        self.0
            .retain(|label| !injected.iter().any(|i| i.name == label.name));
        self.0.extend(injected.iter().cloned());
        self.0.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    }
}

impl From<Vec<Label>> for LabelSet {
    fn from(labels: Vec<Label>) -> Self {
        Self(labels)
    }
}

impl std::iter::FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LabelSet {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> LabelSet {
        pairs.iter().map(|(n, v)| Label::new(*n, *v)).collect()
    }

    #[test]
    fn test_merge_sorts_by_name() {
        let mut set = labels(&[("method", "GET"), ("code", "200")]);
        set.merge(&[Label::new("cluster_id", "prod-1")]);

        assert_eq!(
            set,
            labels(&[("cluster_id", "prod-1"), ("code", "200"), ("method", "GET")])
        );
        assert!(set.is_sorted());
    }

    #[test]
    fn test_merge_injected_value_wins() {
        let mut set = labels(&[("cluster_id", "spoofed"), ("job", "node")]);
        set.merge(&[Label::new("cluster_id", "prod-1")]);

        assert_eq!(set, labels(&[("cluster_id", "prod-1"), ("job", "node")]));
    }

    #[test]
    fn test_merge_is_bytewise() {
        let mut set = labels(&[("a", "1"), ("Z", "2"), ("_x", "3")]);
        set.merge(&[]);

        let names: Vec<&str> = set.iter().map(Label::name).collect();
        assert_eq!(names, vec!["Z", "_x", "a"]);
    }

    #[test]
    fn test_merge_names_stay_unique() {
        let mut set = labels(&[("le", "0.5"), ("cluster_id", "old")]);
        set.merge(&[Label::new("cluster_id", "c"), Label::new("source_ip", "10.0.0.1")]);
        set.merge(&[Label::new("cluster_id", "c2")]);

        assert_eq!(
            set,
            labels(&[("cluster_id", "c2"), ("le", "0.5"), ("source_ip", "10.0.0.1")])
        );
        assert_eq!(set.get("le"), Some("0.5"));
    }
}
