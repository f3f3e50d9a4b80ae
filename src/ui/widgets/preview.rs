use image::imageops::FilterType;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    widgets::Paragraph,
};
use ratatui_image::{Resize, StatefulImage};

use crate::ui::Preview;
use crate::ui::utils::{center_area, center_image};

/// Draw the latest composited strip, scaled to fit and centered
pub fn render_preview_widget(frame: &mut ratatui::Frame<'_>, preview: &mut Preview, area: Rect) {
    if let Some(ref mut img) = preview.image {
        let resize = Resize::Scale(Some(FilterType::Triangle));
        let img_rect = img.size_for(resize.clone(), area);
        let centered_area = center_image(img_rect, area);

        let image = StatefulImage::default().resize(resize);
        frame.render_stateful_widget(image, centered_area, img);
    } else {
        let placeholder_area = center_area(area, Constraint::Length(16), Constraint::Length(1));
        let placeholder = Paragraph::new("Waiting for list").style(Style::default().dark_gray());
        frame.render_widget(placeholder, placeholder_area);
    }
}
