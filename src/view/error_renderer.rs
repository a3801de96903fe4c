use std::io;

use ramhorns::Template;

use crate::view::{parse_template, SiteHeader};

#[derive(ramhorns::Content)]
struct ErrorPage<'a> {
    header: SiteHeader<'a>,
    status: u16,
    title: &'a str,
    message: &'a str,
}

pub struct ErrorRenderer<'a> {
    pub template: Template<'a>,
}

impl ErrorRenderer<'_> {
    pub fn new(error_tpl_src: &str) -> io::Result<ErrorRenderer<'_>> {
        let template = parse_template(error_tpl_src, "error")?;
        Ok(ErrorRenderer {
            template,
        })
    }

    pub fn render(&self, header: SiteHeader, status: u16, message: &str) -> String {
        let title = match status {
            404 => "Page not found",
            _ => "Something went wrong",
        };

        self.template.render(&ErrorPage {
            header,
            status,
            title,
            message,
        })
    }
}
