use serde::{Deserialize, Serialize};
use std::fmt;

/// 頁面標記樹的節點
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// 不經解析、原樣寫入的 HTML 片段（後端回應）
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    pub fn id(self, value: &str) -> Self {
        self.attr("id", value)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, value: &str) -> Self {
        self.child(Node::Text(value.to_string()))
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn element_id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    pub fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.render_into(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.render_into(&mut out);
        }
        out
    }

    /// 只收集文字節點與原樣片段去掉標籤後的文字
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

impl Node {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.render_into(out),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Raw(html) => out.push_str(html),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Text(text) => out.push_str(text),
            Node::Raw(html) => out.push_str(&html_escape::decode_html_entities(&strip_tags(html))),
        }
    }

    /// 深度優先走訪所有元素
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Element)) {
        if let Node::Element(el) = self {
            visit(el);
            for child in &el.children {
                child.walk(visit);
            }
        }
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        match self {
            Node::Element(el) => {
                if el.element_id() == Some(id) {
                    return Some(el);
                }
                el.children
                    .iter_mut()
                    .find_map(|child| child.find_by_id_mut(id))
            }
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// 對應 htmx 的 `hx-get` / `hx-post` 等屬性名稱
    pub fn directive_attr(&self) -> &'static str {
        match self {
            HttpMethod::Get => "hx-get",
            HttpMethod::Post => "hx-post",
            HttpMethod::Put => "hx-put",
            HttpMethod::Patch => "hx-patch",
            HttpMethod::Delete => "hx-delete",
        }
    }

    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerEvent {
    Click,
    Submit,
    Change,
}

impl TriggerEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerEvent::Click => "click",
            TriggerEvent::Submit => "submit",
            TriggerEvent::Change => "change",
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 觸發指令：元素被觸發時要送出的請求與要替換的目標
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerDescriptor {
    pub method: HttpMethod,
    pub path: String,
    /// 目標元素的 id（不含 `#`）
    pub target: String,
    pub event: TriggerEvent,
}

impl TriggerDescriptor {
    pub fn get(path: &str, target: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.to_string(),
            target: target.trim_start_matches('#').to_string(),
            event: TriggerEvent::Click,
        }
    }

    pub fn on(mut self, event: TriggerEvent) -> Self {
        self.event = event;
        self
    }

    pub fn target_selector(&self) -> String {
        format!("#{}", self.target)
    }

    /// 輸出給瀏覽器端 htmx 使用的三個屬性
    pub fn attributes(&self) -> [(&'static str, String); 3] {
        [
            (self.method.directive_attr(), self.path.clone()),
            ("hx-target", self.target_selector()),
            ("hx-trigger", self.event.as_str().to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// 目標內容已替換為回應本體
    Swapped { target: String, bytes: usize },
    /// 請求失敗；`rendered` 表示是否寫入了錯誤訊息片段
    Failed {
        target: String,
        reason: String,
        rendered: bool,
    },
    /// 較新的觸發已發出，這次回應被丟棄
    Superseded { target: String, generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapOrdering {
    /// 依完成順序，最後完成的回應勝出
    #[default]
    Completion,
    /// 只接受同一目標最新一次觸發的回應
    LatestTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    #[default]
    Silent,
    Message,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes_text_but_not_raw() {
        let el = Element::new("div")
            .id("x")
            .text("a < b")
            .child(Node::Raw("<span>hi</span>".to_string()));
        assert_eq!(
            Node::from(el).render(),
            "<div id=\"x\">a &lt; b<span>hi</span></div>"
        );
    }

    #[test]
    fn test_trigger_descriptor_attributes() {
        let trigger = TriggerDescriptor::get("/api/hello-htmx", "#response");
        assert_eq!(trigger.target, "response");
        let attrs = trigger.attributes();
        assert_eq!(attrs[0], ("hx-get", "/api/hello-htmx".to_string()));
        assert_eq!(attrs[1], ("hx-target", "#response".to_string()));
        assert_eq!(attrs[2], ("hx-trigger", "click".to_string()));
    }

    #[test]
    fn test_trigger_on_other_event() {
        let trigger = TriggerDescriptor::get("/api/hello", "out").on(TriggerEvent::Submit);
        assert_eq!(trigger.attributes()[2], ("hx-trigger", "submit".to_string()));
        assert_eq!(trigger.method.to_string(), "GET");
    }

    #[test]
    fn test_text_content_strips_raw_tags() {
        let el = Element::new("div").child(Node::Raw("<b>po</b>ng".to_string()));
        assert_eq!(el.text_content(), "pong");
    }

    #[test]
    fn test_text_content_decodes_entities() {
        let el = Element::new("div").child(Node::Raw("<span>a &amp; b &lt;3</span>".to_string()));
        assert_eq!(el.text_content(), "a & b <3");
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let el = Element::new("a").attr("title", "say \"hi\" & go");
        assert_eq!(
            Node::from(el).render(),
            "<a title=\"say &quot;hi&quot; &amp; go\"></a>"
        );
    }
}
