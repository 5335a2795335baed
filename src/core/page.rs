//! 頁面啟動：殼層文件、掛載點與登陸頁標記

use crate::domain::model::{Element, Node, TriggerDescriptor};
use crate::utils::error::{AppError, Result};
use std::collections::HashMap;

pub const MOUNT_POINT_ID: &str = "app";
pub const RESULT_CONTAINER_ID: &str = "response";
pub const DEMO_TRIGGER_ID: &str = "test-htmx";
pub const DEMO_PATH: &str = "/api/hello-htmx";
pub const BRAND_LABEL: &str = "OpenCode Boilerplate Web";

const HTMX_SCRIPT: &str = "https://unpkg.com/htmx.org@2.0.4";
const STYLESHEETS: &[&str] = &["https://cdn.jsdelivr.net/npm/daisyui@4.12.14/dist/full.min.css"];
const TAILWIND_SCRIPT: &str = "https://cdn.tailwindcss.com";

const MENU_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 24 24" class="inline-block w-5 h-5 stroke-current"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M4 6h16M4 12h16M4 18h16"></path></svg>"#;

/// bootstrap 前的 HTML 殼層
#[derive(Debug, Clone)]
pub struct ShellDocument {
    title: String,
    body: Element,
}

impl ShellDocument {
    /// 含有空白 `#app` 容器的標準殼層
    pub fn new(title: &str) -> Self {
        Self::with_body(title, Element::new("body").child(Element::new("div").id(MOUNT_POINT_ID)))
    }

    pub fn with_body(title: &str, body: Element) -> Self {
        Self {
            title: title.to_string(),
            body,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<!doctype html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"UTF-8\">\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        out.push_str(&format!("<title>{}</title>\n", self.title));
        for href in STYLESHEETS {
            out.push_str(&format!("<link rel=\"stylesheet\" href=\"{}\">\n", href));
        }
        out.push_str(&format!("<script src=\"{}\"></script>\n", TAILWIND_SCRIPT));
        out.push_str(&format!("<script src=\"{}\"></script>\n", HTMX_SCRIPT));
        out.push_str("</head>\n");
        self.body.render_into(&mut out);
        out.push_str("\n</html>\n");
        out
    }
}

impl Default for ShellDocument {
    fn default() -> Self {
        Self::new(BRAND_LABEL)
    }
}

/// 應用程式唯一擁有的掛載點；所有 DOM 變動都經過這裡
#[derive(Debug, Clone)]
pub struct MountPoint {
    id: String,
    document: ShellDocument,
}

impl MountPoint {
    fn root(&self) -> Option<&Element> {
        find_in(&self.document.body, &self.id)
    }

    fn root_mut(&mut self) -> Result<&mut Element> {
        let id = self.id.clone();
        find_in_mut(&mut self.document.body, &id).ok_or(AppError::MountPointMissing { id })
    }

    /// 掛載點底下具有指定 id 的元素數量
    pub fn count_id(&self, id: &str) -> usize {
        let mut count = 0;
        if let Some(root) = self.root() {
            for child in &root.children {
                child.walk(&mut |el| {
                    if el.element_id() == Some(id) {
                        count += 1;
                    }
                });
            }
        }
        count
    }

    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.element(id).map(Element::inner_html)
    }

    pub fn text_of(&self, id: &str) -> Option<String> {
        self.element(id).map(Element::text_content)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        let root = self.root()?;
        root.children.iter().find_map(|child| match child {
            Node::Element(el) => find_in(el, id),
            _ => None,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.element(id).is_some()
    }

    /// 以原樣片段取代目標元素的全部子節點
    pub fn swap_inner(&mut self, id: &str, fragment: String) -> Result<()> {
        let root = self.root_mut()?;
        let target = root
            .children
            .iter_mut()
            .find_map(|child| child.find_by_id_mut(id))
            .ok_or_else(|| AppError::TargetMissing {
                selector: format!("#{}", id),
            })?;
        target.children = vec![Node::Raw(fragment)];
        Ok(())
    }

    pub fn render_document(&self) -> String {
        self.document.render()
    }
}

fn find_in<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
    if el.element_id() == Some(id) {
        return Some(el);
    }
    el.children.iter().find_map(|child| match child {
        Node::Element(inner) => find_in(inner, id),
        _ => None,
    })
}

fn find_in_mut<'a>(el: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if el.element_id() == Some(id) {
        return Some(el);
    }
    el.children
        .iter_mut()
        .find_map(|child| child.find_by_id_mut(id))
}

/// 將固定的登陸頁標記寫入掛載點，並登記所有觸發器
#[derive(Debug, Clone)]
pub struct Bootstrapper {
    mount_id: String,
    demo_trigger: TriggerDescriptor,
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self {
            mount_id: MOUNT_POINT_ID.to_string(),
            demo_trigger: TriggerDescriptor::get(DEMO_PATH, RESULT_CONTAINER_ID),
        }
    }
}

impl Bootstrapper {
    pub fn new(mount_id: &str, demo_trigger: TriggerDescriptor) -> Self {
        Self {
            mount_id: mount_id.to_string(),
            demo_trigger,
        }
    }

    /// 元素 id 對應到型別化的請求描述
    pub fn registrations(&self) -> HashMap<String, TriggerDescriptor> {
        HashMap::from([(DEMO_TRIGGER_ID.to_string(), self.demo_trigger.clone())])
    }

    /// 找不到掛載點時立即失敗，不做靜默處理
    pub fn mount(&self, mut document: ShellDocument) -> Result<MountPoint> {
        let root = find_in_mut(&mut document.body, &self.mount_id).ok_or_else(|| {
            tracing::error!("❌ Mount point '#{}' not found in shell document", self.mount_id);
            AppError::MountPointMissing {
                id: self.mount_id.clone(),
            }
        })?;

        root.children = vec![landing_markup(&self.demo_trigger).into()];
        tracing::debug!("Mounted landing page into '#{}'", self.mount_id);

        Ok(MountPoint {
            id: self.mount_id.clone(),
            document,
        })
    }
}

fn landing_markup(trigger: &TriggerDescriptor) -> Element {
    let navbar = Element::new("div")
        .class("navbar bg-base-100 shadow-lg")
        .child(
            Element::new("div")
                .class("flex-1")
                .child(Element::new("a").class("btn btn-ghost text-xl").text(BRAND_LABEL)),
        )
        .child(
            Element::new("div").class("flex-none").child(
                Element::new("button")
                    .class("btn btn-square btn-ghost")
                    .child(Node::Raw(MENU_ICON.to_string())),
            ),
        );

    let mut demo_button = Element::new("button")
        .id(DEMO_TRIGGER_ID)
        .class("btn btn-secondary join-item");
    for (name, value) in trigger.attributes() {
        demo_button = demo_button.attr(name, &value);
    }
    let demo_button = demo_button.text("Test HTMX");

    let hero = Element::new("div")
        .class("hero bg-base-200 min-h-[calc(100vh-64px)]")
        .child(
            Element::new("div").class("hero-content text-center").child(
                Element::new("div")
                    .class("max-w-md")
                    .child(Element::new("h1").class("text-5xl font-bold").text("Welcome"))
                    .child(Element::new("p").class("py-6").text(
                        "This project serves a Tailwind + DaisyUI page with HTMX fragments from a Rust backend.",
                    ))
                    .child(
                        Element::new("div")
                            .class("join")
                            .child(
                                Element::new("button")
                                    .class("btn btn-primary join-item")
                                    .text("Get Started"),
                            )
                            .child(demo_button),
                    )
                    .child(Element::new("div").id(&trigger.target).class("mt-4")),
            ),
        );

    Element::new("div")
        .class("min-h-screen bg-base-200")
        .child(navbar)
        .child(hero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_renders_single_empty_result_container() {
        let mount = Bootstrapper::default()
            .mount(ShellDocument::default())
            .unwrap();

        assert_eq!(mount.count_id(RESULT_CONTAINER_ID), 1);
        assert_eq!(mount.inner_html(RESULT_CONTAINER_ID).unwrap(), "");
    }

    #[test]
    fn test_mount_missing_container_fails_loudly() {
        let shell = ShellDocument::with_body("x", Element::new("body"));
        let err = Bootstrapper::default().mount(shell).unwrap_err();
        assert!(matches!(err, AppError::MountPointMissing { ref id } if id == "app"));
    }

    #[test]
    fn test_brand_label_and_trigger_attributes_rendered() {
        let mount = Bootstrapper::default()
            .mount(ShellDocument::default())
            .unwrap();

        let html = mount.render_document();
        assert!(html.contains("<a class=\"btn btn-ghost text-xl\">OpenCode Boilerplate Web</a>"));
        assert!(html.contains("hx-get=\"/api/hello-htmx\""));
        assert!(html.contains("hx-target=\"#response\""));
        assert!(html.contains("hx-trigger=\"click\""));
        // 只有示範按鈕帶有指令
        assert_eq!(html.matches("hx-get=").count(), 1);
    }

    #[test]
    fn test_custom_mount_id_and_trigger() {
        let shell = ShellDocument::with_body(
            "x",
            Element::new("body").child(Element::new("main").id("root")),
        );
        let bootstrapper = Bootstrapper::new("root", TriggerDescriptor::get("/api/other", "#out"));

        let mount = bootstrapper.mount(shell).unwrap();

        assert_eq!(mount.count_id("out"), 1);
        assert!(!mount.contains(RESULT_CONTAINER_ID));
        let registrations = bootstrapper.registrations();
        assert_eq!(registrations[DEMO_TRIGGER_ID].path, "/api/other");
        assert!(mount.render_document().contains("<main id=\"root\"><div class=\"min-h-screen"));
    }

    #[test]
    fn test_swap_inner_replaces_children_verbatim() {
        let mut mount = Bootstrapper::default()
            .mount(ShellDocument::default())
            .unwrap();

        mount
            .swap_inner(RESULT_CONTAINER_ID, "<span>hi</span>".to_string())
            .unwrap();
        mount
            .swap_inner(RESULT_CONTAINER_ID, "<span>again</span>".to_string())
            .unwrap();

        assert_eq!(
            mount.inner_html(RESULT_CONTAINER_ID).unwrap(),
            "<span>again</span>"
        );
        assert!(mount.swap_inner("nope", String::new()).is_err());
    }
}
