use std::collections::HashMap;

/// Immutable snapshot of published objects keyed by URI
///
/// Produced once per refresh by the fetch layer and shared read-only across
/// every extraction task.
#[derive(Debug, Clone, Default)]
pub struct ObjectMap {
    objects: HashMap<String, Vec<u8>>,
}

impl ObjectMap {
    pub fn new(objects: HashMap<String, Vec<u8>>) -> Self {
        Self { objects }
    }

    pub fn get(&self, uri: &str) -> Option<&[u8]> {
        self.objects.get(uri).map(Vec::as_slice)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.objects.contains_key(uri)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<U: Into<String>> FromIterator<(U, Vec<u8>)> for ObjectMap {
    fn from_iter<I: IntoIterator<Item = (U, Vec<u8>)>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().map(|(uri, bytes)| (uri.into(), bytes)).collect(),
        }
    }
}
