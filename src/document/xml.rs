use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::LabeledNode;
use crate::error::DocumentError;

/// XML 元素构成的标签树节点
///
/// 只含文本的叶子元素会折叠成父节点的字段：键取 `name` 属性，
/// 没有 `name` 属性时取标签名。其余元素成为节点，属性即字段。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    tag: String,
    fields: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl LabeledNode for XmlNode {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// 尚未闭合的元素
struct OpenElement {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    fields: Vec<(String, String)>,
    children: Vec<XmlNode>,
    has_elements: bool,
}

enum Closed {
    Field { tag: String, key: String, value: String },
    Node(XmlNode),
}

impl OpenElement {
    fn open(start: &BytesStart) -> Result<Self, DocumentError> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.trim().to_string();
            attributes.push((key, value));
        }

        Ok(Self {
            tag,
            attributes,
            text: String::new(),
            fields: Vec::new(),
            children: Vec::new(),
            has_elements: false,
        })
    }

    fn close(self) -> Closed {
        let text = self.text.trim().to_string();
        if !self.has_elements && !text.is_empty() {
            let key = self
                .attributes
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("name"))
                .map(|(_, value)| value.clone())
                .unwrap_or_else(|| self.tag.clone());
            return Closed::Field {
                tag: self.tag,
                key,
                value: text,
            };
        }

        let mut fields = self.attributes;
        fields.extend(self.fields);
        Closed::Node(XmlNode {
            tag: self.tag,
            fields,
            children: self.children,
        })
    }
}

/// 把关闭的元素挂到父元素上；没有父元素时它就是根
fn attach(
    stack: &mut [OpenElement],
    root: &mut Option<XmlNode>,
    closed: Closed,
) -> Result<(), DocumentError> {
    if let Some(parent) = stack.last_mut() {
        parent.has_elements = true;
        match closed {
            Closed::Field { key, value, .. } => parent.fields.push((key, value)),
            Closed::Node(node) => parent.children.push(node),
        }
        return Ok(());
    }

    let node = match closed {
        Closed::Field { tag, key, value } => XmlNode {
            tag,
            fields: vec![(key, value)],
            children: Vec::new(),
        },
        Closed::Node(node) => node,
    };
    if root.is_some() {
        return Err(DocumentError::Unbalanced(node.tag));
    }
    *root = Some(node);
    Ok(())
}

/// 解析整份 XML 文本为标签树
pub fn parse_document(text: &str) -> Result<XmlNode, DocumentError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(OpenElement::open(&start)?),
            Event::Empty(start) => {
                let closed = OpenElement::open(&start)?.close();
                attach(&mut stack, &mut root, closed)?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    DocumentError::Unbalanced(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                attach(&mut stack, &mut root, element.close())?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DocumentError::Unbalanced(open.tag));
    }
    root.ok_or(DocumentError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::depth_first;

    const REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Report name="System Diagnostics">
  <Section>
    <Item>
      <Data name="component">SysHealthCpuComponent</Data>
      <Data name="util"> 12.5 </Data>
    </Item>
    <Item>
      <Data name="component">SysHealthMemComponent</Data>
      <Data name="detail">Available: 4096 MB &amp; falling</Data>
    </Item>
  </Section>
</Report>"#;

    #[test]
    fn test_data_elements_become_fields() {
        let root = parse_document(REPORT).unwrap();
        assert_eq!(root.tag(), "Report");
        assert_eq!(root.field("name"), Some("System Diagnostics"));

        let items: Vec<_> = depth_first(&root).filter(|n| n.tag() == "Item").collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].field("component"), Some("SysHealthCpuComponent"));
        assert_eq!(items[0].field("util"), Some("12.5"));
        assert_eq!(items[1].field("detail"), Some("Available: 4096 MB & falling"));
        assert!(items[0].children().is_empty());
    }

    #[test]
    fn test_unnamed_leaf_is_keyed_by_tag() {
        let root = parse_document(
            "<Process><PID>42</PID><WorkingSet>2048</WorkingSet><ProcessName>svc</ProcessName></Process>",
        )
        .unwrap();
        assert_eq!(root.field("pid"), Some("42"));
        assert_eq!(root.field("workingset"), Some("2048"));
        assert_eq!(root.field("ProcessName"), Some("svc"));
    }

    #[test]
    fn test_leaf_root_becomes_single_field_node() {
        let root = parse_document("<util>3.5</util>").unwrap();
        assert_eq!(root.tag(), "util");
        assert_eq!(root.field("util"), Some("3.5"));
    }

    #[test]
    fn test_malformed_documents_are_rejected() {
        assert!(matches!(parse_document(""), Err(DocumentError::Empty)));
        assert!(matches!(parse_document("   "), Err(DocumentError::Empty)));
        assert!(parse_document("<Report><Item></Report>").is_err());
        assert!(parse_document("<Report><Item>").is_err());
        assert!(matches!(
            parse_document("<a/><b/>"),
            Err(DocumentError::Unbalanced(tag)) if tag == "b"
        ));
    }
}
