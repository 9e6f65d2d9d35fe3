use diffbind::prelude::*;

///
/// PictureView
///
/// Minimal view for pictures. Handler calls land on counters so tests can
/// see which path a payload took.
///

#[derive(Clone, Debug, Default)]
pub struct PictureView {
    pub image: String,
    pub title: String,
    pub title_bound: bool,
    pub likes_refreshes: u32,
    pub line_refreshes: u32,
    pub refreshes: u32,
}

impl PictureView {
    pub fn set_image(&mut self, image: &str) {
        self.image = image.to_string();
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.title_bound = false;
    }

    pub fn bind_title(&mut self, title: &str) {
        self.title = title.to_string();
        self.title_bound = true;
    }
}

// picture instructor handlers and view methods, routed by name
impl BindTarget for PictureView {
    fn call_handler(&mut self, handler: &str, _arg: HandlerArg) {
        match handler {
            "on_likes" => self.likes_refreshes += 1,
            "on_line" => self.line_refreshes += 1,
            "on_refresh" => self.refreshes += 1,
            _ => {}
        }
    }

    fn call_view(&mut self, method: &str, value: Value) {
        let text = value.as_text().unwrap_or_default();

        match method {
            "set_image" => self.set_image(text),
            "set_title" => self.set_title(text),
            "bind_title" => self.bind_title(text),
            _ => {}
        }
    }
}
