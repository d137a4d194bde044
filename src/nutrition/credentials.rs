use super::error::NutritionError;

/// Ordered API keys for one request plus the index of the key in use.
///
/// Built fresh from the user's settings on every request, so concurrent
/// requests never share rotation progress.
#[derive(Clone, Default)]
pub struct CredentialSet {
    keys: Vec<String>,
    fallback: Option<String>,
    index: usize,
}

impl CredentialSet {
    pub fn new(keys: Vec<String>, fallback: Option<String>) -> Self {
        let mut set = Self {
            keys: Vec::new(),
            fallback,
            index: 0,
        };
        set.set_credentials(keys);
        set
    }

    /// Replaces the key list and starts again from the first key. Blank keys are dropped.
    pub fn set_credentials(&mut self, keys: Vec<String>) {
        self.keys = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        self.index = 0;
    }

    pub fn current(&self) -> Result<&str, NutritionError> {
        if let Some(key) = self.keys.get(self.index) {
            return Ok(key);
        }
        self.fallback
            .as_deref()
            .ok_or(NutritionError::NoCredentialAvailable)
    }

    /// Moves to the next key. Returns false, leaving the active key unchanged,
    /// when there is nothing to rotate to.
    pub fn rotate(&mut self) -> bool {
        if self.keys.len() > 1 {
            self.index = (self.index + 1) % self.keys.len();
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSet")
            .field("keys", &self.keys.len())
            .field("fallback", &self.fallback.is_some())
            .field("index", &self.index)
            .finish()
    }
}
