//! Schema-free labeled trees.
//!
//! The extractor only needs named text fields and children, so every
//! document format is reduced to [`LabeledNode`].

pub mod loader;
pub mod xml;

pub use loader::{find_documents, load_document};
pub use xml::{parse_document, XmlNode};

/// 带命名字段的树节点
pub trait LabeledNode {
    /// 按名称读取字段文本
    fn field(&self, name: &str) -> Option<&str>;

    /// 直接子节点（文档顺序）
    fn children(&self) -> &[Self]
    where
        Self: Sized;

    /// 依次尝试多个别名，返回第一个存在的字段
    fn field_any(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.field(name))
    }
}

/// 深度优先（先序）遍历，包含根节点本身
pub fn depth_first<N: LabeledNode>(root: &N) -> DepthFirst<'_, N> {
    DepthFirst { stack: vec![root] }
}

pub struct DepthFirst<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: LabeledNode> Iterator for DepthFirst<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
