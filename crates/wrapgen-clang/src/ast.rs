//! Serde model of clang's `-ast-dump=json` output.
//!
//! Only the fields extraction reads are decoded; everything else in a node
//! (locations, ranges, ids, expression trees) is ignored.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Node kinds whose children extraction walks. The `inner` of every other
/// node (function bodies, initializer expressions, record fields) is skipped
/// without being decoded.
const WALKED_KINDS: &[&str] = &["TranslationUnitDecl", "LinkageSpecDecl", "FunctionDecl"];

/// One node of the dumped AST.
#[derive(Debug, Clone, Default)]
pub struct AstNode {
    pub kind: String,
    pub name: Option<String>,
    pub ty: Option<QualType>,
    /// Set on `FunctionDecl`s whose parameter list ends in `...`.
    pub variadic: bool,
    /// `struct`, `union` or `enum` on record declarations.
    pub tag_used: Option<String>,
    /// Compiler-synthesised declarations (builtin typedefs and the like).
    pub is_implicit: bool,
    /// Children; empty for kinds outside [`WALKED_KINDS`].
    pub inner: Vec<AstNode>,
}

impl<'de> Deserialize<'de> for AstNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AstNodeVisitor)
    }
}

struct AstNodeVisitor;

impl<'de> Visitor<'de> for AstNodeVisitor {
    type Value = AstNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a clang AST node object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<AstNode, A::Error> {
        let mut node = AstNode::default();
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "kind" => node.kind = map.next_value()?,
                "name" => node.name = map.next_value()?,
                "type" => node.ty = map.next_value()?,
                "variadic" => node.variadic = map.next_value()?,
                "tagUsed" => node.tag_used = map.next_value()?,
                "isImplicit" => node.is_implicit = map.next_value()?,
                // clang writes `kind` before `inner`; a node whose kind is not
                // known yet keeps its children.
                "inner"
                    if node.kind.is_empty() || WALKED_KINDS.contains(&node.kind.as_str()) =>
                {
                    node.inner = map.next_value()?;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        if node.kind.is_empty() {
            return Err(de::Error::missing_field("kind"));
        }
        Ok(node)
    }
}

/// Type spelling attached to a node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualType {
    pub qual_type: String,
    #[serde(default)]
    pub desugared_qual_type: Option<String>,
}

impl AstNode {
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().map(|t| t.qual_type.as_str())
    }

    /// Direct children of the given kind.
    pub fn children<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a AstNode> + 'a {
        self.inner.iter().filter(move |n| n.is(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_function_node() {
        let json = r#"{
            "id": "0x1",
            "kind": "FunctionDecl",
            "loc": {"offset": 10, "file": "SDL_video.h", "line": 3},
            "name": "SDL_ShowWindow",
            "type": {"qualType": "bool (SDL_Window *)"},
            "inner": [
                {"id": "0x2", "kind": "ParmVarDecl", "name": "window",
                 "type": {"qualType": "SDL_Window *"}},
                {"id": "0x3", "kind": "VisibilityAttr", "inherited": true}
            ]
        }"#;
        let node: AstNode = serde_json::from_str(json).unwrap();
        assert!(node.is("FunctionDecl"));
        assert_eq!(node.name(), Some("SDL_ShowWindow"));
        assert_eq!(node.qual_type(), Some("bool (SDL_Window *)"));
        assert!(!node.variadic);

        let params: Vec<_> = node.children("ParmVarDecl").collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].qual_type(), Some("SDL_Window *"));
    }

    #[test]
    fn decode_record_and_implicit_nodes() {
        let record: AstNode =
            serde_json::from_str(r#"{"kind": "RecordDecl", "name": "SDL_Window", "tagUsed": "struct"}"#)
                .unwrap();
        assert_eq!(record.tag_used.as_deref(), Some("struct"));
        assert!(record.inner.is_empty());

        let implicit: AstNode = serde_json::from_str(
            r#"{"kind": "TypedefDecl", "isImplicit": true, "name": "__int128_t",
                "type": {"qualType": "__int128", "desugaredQualType": "__int128"}}"#,
        )
        .unwrap();
        assert!(implicit.is_implicit);
        assert_eq!(
            implicit.ty.unwrap().desugared_qual_type.as_deref(),
            Some("__int128")
        );
    }

    #[test]
    fn bodies_are_skipped_without_decoding() {
        // Not a node list: decoding it as children would fail.
        let deep = format!("{}{}", "[".repeat(100), "]".repeat(100));
        let json = format!(
            r#"{{"kind": "FunctionDecl", "name": "SDL_clamp",
                "type": {{"qualType": "int (int)"}},
                "inner": [
                  {{"kind": "ParmVarDecl", "name": "x", "type": {{"qualType": "int"}}}},
                  {{"kind": "CompoundStmt", "inner": [{{"kind": "ReturnStmt", "inner": {deep}}}]}}
                ]}}"#
        );
        let node: AstNode = serde_json::from_str(&json).unwrap();

        assert_eq!(node.inner.len(), 2);
        assert_eq!(node.children("ParmVarDecl").count(), 1);
        let body = node.children("CompoundStmt").next().unwrap();
        assert!(body.inner.is_empty());
    }

    #[test]
    fn record_fields_are_not_decoded() {
        let record: AstNode = serde_json::from_str(
            r#"{"kind": "RecordDecl", "name": "SDL_Point", "tagUsed": "struct",
                "inner": [{"kind": "FieldDecl", "name": "x", "type": {"qualType": "int"}}]}"#,
        )
        .unwrap();
        assert_eq!(record.name(), Some("SDL_Point"));
        assert!(record.inner.is_empty());
    }

    #[test]
    fn node_without_kind_is_rejected() {
        assert!(serde_json::from_str::<AstNode>(r#"{"name": "x"}"#).is_err());
    }

    #[test]
    fn empty_name_is_none() {
        let node: AstNode = serde_json::from_str(r#"{"kind": "ParmVarDecl", "name": ""}"#).unwrap();
        assert_eq!(node.name(), None);
    }
}
