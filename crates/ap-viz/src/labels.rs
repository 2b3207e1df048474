//! Titles and file-name fragments for comparison plots.

/// Collapse every whitespace run into a single `_`.
pub fn sanitize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Detector / selection labels shared by every plot of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelContext {
    det_sel: String,
}

impl LabelContext {
    /// Blank labels are skipped; the rest are joined by a space.
    pub fn new(detector: Option<&str>, selection: Option<&str>) -> Self {
        let det_sel = [detector, selection]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self { det_sel }
    }

    pub fn det_sel(&self) -> &str {
        &self.det_sel
    }

    /// `"<det sel>, "` or empty.
    pub fn title_prefix(&self) -> String {
        if self.det_sel.is_empty() { String::new() } else { format!("{}, ", self.det_sel) }
    }

    /// `"<det_sel>_"` or empty.
    pub fn file_prefix(&self) -> String {
        if self.det_sel.is_empty() { String::new() } else { format!("{}_", sanitize(&self.det_sel)) }
    }

    /// `"<det sel>, events"` or `"<det sel>, events identified as <what>"`.
    pub fn title(&self, identified_as: Option<&str>) -> String {
        match identified_as {
            Some(what) => format!("{}events identified as {what}", self.title_prefix()),
            None => format!("{}events", self.title_prefix()),
        }
    }
}

/// Final file name: `<stem>_<h0>_<h1>_<kind>.<ext>` with whitespace replaced.
///
/// A stem that already ends in `_` is not given a second separator.
pub fn output_file_name(stem: &str, h0_name: &str, h1_name: &str, kind: &str, ext: &str) -> String {
    let mut prefix = stem.to_string();
    if !prefix.is_empty() && !prefix.ends_with('_') {
        prefix.push('_');
    }
    sanitize(&format!("{prefix}{h0_name}_{h1_name}_{kind}.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize("DeepCore  event\tselection "), "DeepCore_event_selection");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn empty_labels() {
        let l = LabelContext::new(None, Some("   "));
        assert_eq!(l.title(None), "events");
        assert_eq!(l.file_prefix(), "");
    }

    #[test]
    fn detector_and_selection() {
        let l = LabelContext::new(Some(" DeepCore "), Some("MSU sample"));
        assert_eq!(l.det_sel(), "DeepCore MSU sample");
        assert_eq!(l.title(Some("track")), "DeepCore MSU sample, events identified as track");
        assert_eq!(l.file_prefix(), "DeepCore_MSU_sample_");
    }

    #[test]
    fn file_names() {
        assert_eq!(output_file_name("total_", "NO", "IO", "asymmetry", "pdf"), "total_NO_IO_asymmetry.pdf");
        assert_eq!(output_file_name("trck", "NO", "IO", "fraction", "pdf"), "trck_NO_IO_fraction.pdf");
        assert_eq!(output_file_name("", "normal ordering", "IO", "difference", "svg"), "normal_ordering_IO_difference.svg");
    }
}
