use super::{Handler, RegisteredHandler, RegistryError};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::{hex, Selector};
use std::{collections::HashMap, sync::Arc};

/// The source of the function fragments passed to [`HandlerRegistry::register`].
#[derive(Debug, Clone)]
pub enum AbiSource {
    /// Human-readable function signatures, with or without the `function` keyword.
    Signatures(Vec<String>),
    /// A parsed abi.
    Abi(JsonAbi),
}

impl AbiSource {
    /// Returns the function fragments declared by the source.
    pub fn functions(self) -> Result<Vec<Function>, RegistryError> {
        let abi = match self {
            Self::Abi(abi) => abi,
            Self::Signatures(signatures) => {
                let items = signatures
                    .iter()
                    .flat_map(|s| s.lines())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(|s| {
                        if is_item(s) {
                            s.to_string()
                        } else {
                            format!("function {s}")
                        }
                    })
                    .collect::<Vec<_>>();
                JsonAbi::parse(items.iter().map(String::as_str))?
            }
        };
        Ok(abi.functions().cloned().collect())
    }
}

/// Returns true if the human-readable item starts with an abi item keyword.
fn is_item(s: &str) -> bool {
    ["function ", "event ", "error ", "constructor", "fallback", "receive"]
        .iter()
        .any(|keyword| s.starts_with(keyword))
}

impl From<&str> for AbiSource {
    fn from(signature: &str) -> Self {
        Self::Signatures(vec![signature.to_string()])
    }
}

impl From<String> for AbiSource {
    fn from(signature: String) -> Self {
        Self::Signatures(vec![signature])
    }
}

impl From<Vec<&str>> for AbiSource {
    fn from(signatures: Vec<&str>) -> Self {
        Self::Signatures(signatures.into_iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AbiSource {
    fn from(signatures: [&str; N]) -> Self {
        Self::Signatures(signatures.into_iter().map(ToString::to_string).collect())
    }
}

impl From<Vec<String>> for AbiSource {
    fn from(signatures: Vec<String>) -> Self {
        Self::Signatures(signatures)
    }
}

impl From<JsonAbi> for AbiSource {
    fn from(abi: JsonAbi) -> Self {
        Self::Abi(abi)
    }
}

/// A key accepted by [`HandlerRegistry::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKey {
    /// A 4-byte selector.
    Selector(Selector),
    /// A bare function name or a canonical signature.
    Name(String),
}

impl From<Selector> for HandlerKey {
    fn from(selector: Selector) -> Self {
        Self::Selector(selector)
    }
}

impl From<&Function> for HandlerKey {
    fn from(function: &Function) -> Self {
        Self::Selector(function.selector())
    }
}

impl From<&str> for HandlerKey {
    /// `0x` followed by 8 hex digits is read as a selector, anything else as a name.
    fn from(key: &str) -> Self {
        match key.strip_prefix("0x") {
            Some(digits) if digits.len() == 8 => hex::decode(digits)
                .map(|bytes| Self::Selector(Selector::from_slice(&bytes)))
                .unwrap_or_else(|_| Self::Name(key.to_string())),
            _ => Self::Name(key.to_string()),
        }
    }
}

/// Maps selectors to their registered handlers.
#[derive(Debug, Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<Selector, Arc<RegisteredHandler>>,
    /// Selectors in registration order.
    order: Vec<Selector>,
}

impl HandlerRegistry {
    /// Binds a single implementation to an abi that declares exactly one function.
    pub fn register(
        &mut self,
        abi: impl Into<AbiSource>,
        handler: Arc<dyn Handler>,
    ) -> Result<Arc<RegisteredHandler>, RegistryError> {
        let mut functions = abi.into().functions()?;
        if functions.len() != 1 {
            return Err(RegistryError::ExpectedSingleFunction(functions.len()));
        }
        let function = functions.remove(0);
        Ok(self.insert(function, handler))
    }

    /// Binds implementations to the functions of an abi.
    ///
    /// Each key is a function name, a canonical signature or a `0x` selector. All keys are
    /// validated before any handler is inserted.
    pub fn register_named<K: AsRef<str>>(
        &mut self,
        abi: impl Into<AbiSource>,
        handlers: impl IntoIterator<Item = (K, Arc<dyn Handler>)>,
    ) -> Result<Vec<Arc<RegisteredHandler>>, RegistryError> {
        let functions = abi.into().functions()?;
        let bound = handlers
            .into_iter()
            .map(|(key, handler)| {
                let key = key.as_ref();
                let selector = match HandlerKey::from(key) {
                    HandlerKey::Selector(selector) => Some(selector),
                    HandlerKey::Name(_) => None,
                };
                functions
                    .iter()
                    .find(|f| {
                        f.name == key || f.signature() == key || Some(f.selector()) == selector
                    })
                    .map(|f| (f.clone(), handler))
                    .ok_or_else(|| RegistryError::UnknownFunction(key.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bound.into_iter().map(|(function, handler)| self.insert(function, handler)).collect())
    }

    fn insert(&mut self, function: Function, handler: Arc<dyn Handler>) -> Arc<RegisteredHandler> {
        let registered = Arc::new(RegisteredHandler { function, handler });
        let selector = registered.selector();
        if self.handlers.insert(selector, registered.clone()).is_some() {
            tracing::debug!(target: "ezccip::registry", %selector, "Replaced handler");
        } else {
            self.order.push(selector);
        }
        tracing::trace!(
            target: "ezccip::registry",
            %selector,
            signature = %registered.signature(),
            "Registered handler"
        );
        registered
    }

    /// Returns the handler registered for a selector.
    pub fn get(&self, selector: &Selector) -> Option<&Arc<RegisteredHandler>> {
        self.handlers.get(selector)
    }

    /// Finds a handler by selector, bare name or canonical signature.
    ///
    /// Name lookups scan in registration order, so of several overloads sharing a name the
    /// first registered is returned.
    pub fn find(&self, key: impl Into<HandlerKey>) -> Option<&Arc<RegisteredHandler>> {
        match key.into() {
            HandlerKey::Selector(selector) => self.get(&selector),
            HandlerKey::Name(name) => {
                self.iter().find(|h| h.name() == name || h.signature() == name)
            }
        }
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Returns an iterator over the registered handlers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisteredHandler>> {
        self.order.iter().filter_map(|selector| self.handlers.get(selector))
    }
}
