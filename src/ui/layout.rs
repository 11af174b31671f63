use tui::layout::{Constraint, Layout, Rect, Size};

pub const HEADER_HEIGHT: u16 = 3;
pub const TAB_BAR_HEIGHT: u16 = 3;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    /// Countdown and refresh status strip, present in both modes.
    pub header: [Rect; 2],
    pub tab_bar: [Rect; 2],
    pub main: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false)
    }

    pub fn update(&mut self, area: Rect, presentation: bool) {
        *self = Self::from_rect(area, presentation);
    }

    fn from_rect(area: Rect, presentation: bool) -> Self {
        if presentation {
            // Fullscreen drops the tab bar; the countdown header stays.
            let [header, main] = Layout::vertical([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Fill(1),
            ])
            .areas(area);
            return LayoutAreas {
                header: Self::split_header(header),
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
            };
        }

        let [header, tab, main] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(area);

        LayoutAreas {
            header: Self::split_header(header),
            tab_bar: Self::split_tab_bar(tab),
            main,
        }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area)
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_layout_stacks_header_tabs_and_main() {
        let areas = LayoutAreas::new(Size::new(80, 30));
        assert_eq!(areas.header[0].y, 0);
        assert_eq!(areas.tab_bar[0].y, HEADER_HEIGHT);
        assert_eq!(areas.main.y, HEADER_HEIGHT + TAB_BAR_HEIGHT);
        assert_eq!(areas.main.height, 30 - HEADER_HEIGHT - TAB_BAR_HEIGHT);
    }

    #[test]
    fn presentation_layout_drops_the_tab_bar() {
        let mut areas = LayoutAreas::new(Size::new(80, 30));
        areas.update(Rect::new(0, 0, 80, 30), true);
        assert_eq!(areas.tab_bar[0], Rect::ZERO);
        assert_eq!(areas.main.y, HEADER_HEIGHT);
        assert_eq!(areas.main.height, 30 - HEADER_HEIGHT);
    }

    #[test]
    fn header_keeps_full_width_across_its_halves() {
        let areas = LayoutAreas::new(Size::new(100, 30));
        let total: u16 = areas.header.iter().map(|r| r.width).sum();
        assert_eq!(total, 100);
    }
}
