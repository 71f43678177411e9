use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// A handle to one location in the document tree.
///
/// Implemented by the plain [`Node`](crate::Node) and the caching
/// [`CachedNode`](crate::CachedNode). Navigation always yields the same
/// implementation, so behavior carries over to every derived location.
pub trait Location: Sized + fmt::Display {
    /// The node URL, never ending in `/`.
    fn as_str(&self) -> &str;

    /// Resolve `path` below this location with URL-join semantics.
    ///
    /// Leading slashes in `path` are ignored, `.` and `..` are normalized,
    /// and an empty path yields this location again.
    fn child(&self, path: &str) -> Result<Self, Error>;

    /// The enclosing location, or `None` at the root of the tree.
    fn parent(&self) -> Option<Self>;

    /// Final segment of the URL.
    fn name(&self) -> &str {
        let url = self.as_str();
        url.rsplit('/').next().unwrap_or(url)
    }

    fn get(&self) -> Result<Value, Error>;

    /// GET with extra query parameters, e.g. `shallow=true`.
    fn get_with(&self, params: &HashMap<String, String>) -> Result<Value, Error>;

    fn put<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error>;

    fn patch<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error>;

    /// Append `data` under a server-generated push key.
    fn post<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error>;

    fn delete(&self) -> Result<Value, Error>;

    fn set<T: Serialize + ?Sized>(&self, value: &T) -> Result<Value, Error> {
        self.put(value)
    }

    fn push<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.post(data)
    }

    fn update<T: Serialize + ?Sized>(&self, data: &T) -> Result<Value, Error> {
        self.patch(data)
    }

    fn remove(&self) -> Result<Value, Error> {
        self.delete()
    }

    /// Read and deserialize into `T`.
    fn get_as<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(self.get()?).map_err(Error::Decode)
    }

    /// Push `data` and return the location the server created for it.
    fn push_child<T: Serialize + ?Sized>(&self, data: &T) -> Result<Self, Error> {
        #[derive(Deserialize)]
        struct PushKey {
            name: String,
        }

        let key: PushKey = serde_json::from_value(self.post(data)?).map_err(Error::Decode)?;
        self.child(&key.name)
    }
}
