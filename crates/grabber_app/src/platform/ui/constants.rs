pub const APP_TITLE: &str = " Grabber ";
pub const INPUT_TITLE: &str = " Video or playlist URL ";
pub const PREVIEW_TITLE: &str = " Preview ";
pub const PROGRESS_TITLE: &str = " Progress ";
pub const RESULT_TITLE: &str = " Download complete ";
pub const ERROR_TITLE: &str = " Error ";
pub const ALERT_TITLE: &str = " Notice ";
pub const HELP_TITLE: &str = " Keys ";

pub const HELP_TEXT: &str = "Enter start | Tab format | Up/Down move | Space toggle | Ctrl+A all \
| Ctrl+X cancel | Ctrl+O open link | Ctrl+U clear | Esc dismiss | Ctrl+Q quit";
pub const ALERT_HINT: &str = "Press Enter or Esc";
pub const RESULT_HINT: &str = "Ctrl+O opens the link in a browser";
pub const ERROR_HINT: &str = "Esc to dismiss";
