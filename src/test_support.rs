//! Shared fakes for unit tests: a scripted page driver and an in-memory
//! selector store.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::{PageSightError, PageSightResult};
use crate::memory::{MemoryStore, SelectorStat};
use crate::perception::traits::PageDriver;
use crate::perception::types::ElementDescriptor;

/// Page driver with queued evaluate responses and a fixed screenshot.
/// Records every script (and argument) it is handed.
pub struct FakePageDriver {
    eval_queue: Mutex<VecDeque<PageSightResult<Value>>>,
    screenshot: Mutex<Option<PageSightResult<Vec<u8>>>>,
    scripts: Mutex<Vec<String>>,
    args: Mutex<Vec<Value>>,
    url: String,
}

impl FakePageDriver {
    pub fn new() -> Self {
        Self {
            eval_queue: Mutex::new(VecDeque::new()),
            screenshot: Mutex::new(None),
            scripts: Mutex::new(Vec::new()),
            args: Mutex::new(Vec::new()),
            url: "https://www.example.com/page".to_string(),
        }
    }

    pub fn with_eval_ok(self, value: Value) -> Self {
        self.eval_queue.lock().unwrap().push_back(Ok(value));
        self
    }

    pub fn with_eval_err(self, err: PageSightError) -> Self {
        self.eval_queue.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn with_screenshot(self, png: Vec<u8>) -> Self {
        *self.screenshot.lock().unwrap() = Some(Ok(png));
        self
    }

    pub fn with_screenshot_err(self, err: PageSightError) -> Self {
        *self.screenshot.lock().unwrap() = Some(Err(err));
        self
    }

    pub fn recorded_scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn recorded_args(&self) -> Vec<Value> {
        self.args.lock().unwrap().clone()
    }

    fn next_eval(&self) -> PageSightResult<Value> {
        self.eval_queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PageSightError::Driver("no scripted response".into())))
    }
}

#[async_trait]
impl PageDriver for FakePageDriver {
    async fn evaluate(&self, script: &str) -> PageSightResult<Value> {
        self.scripts.lock().unwrap().push(script.to_string());
        self.next_eval()
    }

    async fn evaluate_with_arg(&self, script: &str, arg: Value) -> PageSightResult<Value> {
        self.scripts.lock().unwrap().push(script.to_string());
        self.args.lock().unwrap().push(arg);
        self.next_eval()
    }

    async fn screenshot(&self) -> PageSightResult<Vec<u8>> {
        match &*self.screenshot.lock().unwrap() {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(e)) => Err(PageSightError::Driver(e.to_string())),
            None => Err(PageSightError::Driver("no screenshot scripted".into())),
        }
    }

    fn url(&self) -> String {
        self.url.clone()
    }
}

/// Selector store returning a fixed stat list, or failing every lookup.
/// Records the queries it receives.
pub struct FakeMemory {
    stats: Vec<SelectorStat>,
    fail: bool,
    queries: Mutex<Vec<(String, String, usize)>>,
}

impl FakeMemory {
    pub fn with_stat(selector: &str, success_count: u32) -> Self {
        Self {
            stats: vec![SelectorStat {
                selector: selector.to_string(),
                success_count,
                confidence: 0.9,
                last_used: None,
            }],
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            stats: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl MemoryStore for FakeMemory {
    async fn get_best_selectors(
        &self,
        domain: &str,
        action_kind: &str,
        limit: usize,
    ) -> PageSightResult<Vec<SelectorStat>> {
        self.queries
            .lock()
            .unwrap()
            .push((domain.to_string(), action_kind.to_string(), limit));
        if self.fail {
            return Err(PageSightError::Memory("store offline".into()));
        }
        Ok(self.stats.clone())
    }
}

/// Raw scan entry the page script would emit, JSON form.
pub fn raw_element(id: u32, tag: &str, top: i32, visible: bool) -> Value {
    json!({
        "id": id,
        "tag": tag,
        "type": "",
        "role": "",
        "text": format!("{tag} {id}"),
        "href": "",
        "class_name": "",
        "dom_id": "",
        "x": 60,
        "y": top + 15,
        "top": top,
        "left": 10,
        "width": 100,
        "height": 30,
        "visible": visible,
        "z_index": 0
    })
}

/// Parsed descriptor with sane geometry (100x30 box at the given top).
pub fn descriptor(id: u32, tag: &str, top: i32, visible: bool) -> ElementDescriptor {
    serde_json::from_value(raw_element(id, tag, top, visible)).unwrap()
}

/// Solid white PNG of the given dimensions.
pub fn blank_png(width: u32, height: u32) -> Vec<u8> {
    let canvas = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}
