use super::Shell;
use crate::commands::SummaryReport;

impl Shell<'_> {
    pub(super) fn show_report(&mut self) -> anyhow::Result<()> {
        let report = SummaryReport::build(self.library, self.today(), self.threshold)?;
        let text = report.render(&self.ui);
        self.say(&text)
    }
}
