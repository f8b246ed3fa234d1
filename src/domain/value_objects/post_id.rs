use serde::{Deserialize, Serialize};
use std::fmt;

/// 投稿の識別子。
///
/// CMS は数値 ID、ストアは文字列 ID を返すため、キャッシュやストアのキーとして
/// 使う前に必ず文字列の正規形へ揃える。`PostId::from(1)` と `PostId::from("1")`
/// は同じキーになる。文字列は trim しないので `" 1"` は別のキー。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl From<&PostId> for PostId {
    fn from(id: &PostId) -> Self {
        id.clone()
    }
}

impl From<String> for PostId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&String> for PostId {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&str> for PostId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

macro_rules! post_id_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PostId {
                fn from(value: $ty) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

post_id_from_integer!(u32, u64, i32, i64, usize);
