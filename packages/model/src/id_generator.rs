use crate::element::{Element, ElementId};
use crate::query::depth_first;
use crc32fast::Hasher;

/// Derive the id seed for a template from its persistent id using CRC32
pub fn get_template_seed(template_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(b"template://");
    hasher.update(template_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for elements of one template.
///
/// Ids have the shape `<seed>-<n>`. Element ids are always generated by the
/// caller before an element enters the tree; the tree operations never mint
/// ids themselves.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(template_id: &str) -> Self {
        Self::from_seed(get_template_seed(template_id))
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Continue numbering after the highest counter already used in `tree`,
    /// so ids minted in this session never collide with persisted ones.
    pub fn resume(seed: String, tree: &[Element]) -> Self {
        let prefix = format!("{seed}-");
        let count = depth_first(tree)
            .filter_map(|element| element.id.as_str().strip_prefix(&prefix))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        Self { seed, count }
    }

    /// Generate next sequential id.
    ///
    /// Once the counter is exhausted, numbering restarts under the seed
    /// extended with the last counter, which no earlier id can match.
    pub fn new_id(&mut self) -> ElementId {
        match self.count.checked_add(1) {
            Some(next) => self.count = next,
            None => {
                self.seed = format!("{}-{}", self.seed, self.count);
                self.count = 1;
            }
        }
        ElementId::new(format!("{}-{}", self.seed, self.count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}
