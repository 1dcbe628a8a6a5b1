//! Console messages in English and Chinese

use crate::config::{Lang, TimeMode};
use crate::protocol::Choice;
use crate::types::EntryKind;
use chrono::{DateTime, Local};
use std::path::Path;
use std::time::SystemTime;

/// Localized message catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Messages {
    lang: Lang,
}

/// Local wall-clock rendering used for timestamps
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

impl Messages {
    pub fn new(lang: Lang) -> Self {
        Self { lang }
    }

    fn pick(&self, en: &'static str, zh: &'static str) -> &'static str {
        match self.lang {
            Lang::En => en,
            Lang::Zh => zh,
        }
    }

    pub fn choice(&self, choice: Choice) -> &'static str {
        match choice {
            Choice::Yes => self.pick("Yes", "是"),
            Choice::No => self.pick("No", "否"),
            Choice::Select => self.pick("Let me select", "让我选择"),
            Choice::Acknowledge => self.pick("Acknowledge", "知道了"),
            Choice::Quit => self.pick("Quit", "退出"),
        }
    }

    pub fn kind(&self, kind: EntryKind) -> &'static str {
        match kind {
            EntryKind::File => self.pick("file", "文件"),
            EntryKind::Folder => self.pick("folder", "文件夹"),
            EntryKind::Symlink => self.pick("symlink", "快捷方式"),
        }
    }

    pub fn ask_source(&self) -> &'static str {
        self.pick(
            "What's the path of the source folder? ",
            "您想备份哪个文件夹？（备份的来源）",
        )
    }

    pub fn ask_destination(&self) -> &'static str {
        self.pick(
            "What's the path of the destination folder? ",
            "您想备份到哪个文件夹？（备份目的地）",
        )
    }

    pub fn folder_not_found(&self, path: &Path) -> String {
        format!("{}{}", self.pick("Folder not found: ", "未找到文件夹："), path.display())
    }

    pub fn not_a_folder(&self, path: &Path) -> String {
        format!("{}{}", self.pick("Not a folder: ", "不是文件夹："), path.display())
    }

    pub fn root(&self) -> &'static str {
        self.pick("[root]", "[起始目录]")
    }

    pub fn source_extras(&self) -> &'static str {
        self.pick(
            "Source has the following more items in this folder",
            "备份来源的这个文件夹中有以下从未备份过的项目",
        )
    }

    pub fn destination_extras(&self) -> &'static str {
        self.pick(
            "Destination has the following more items in this folder",
            "备份至的这个目的地文件夹中有以下项目不在备份来源当中",
        )
    }

    pub fn copy_all_question(&self) -> &'static str {
        self.pick(
            "Would you like to copy all the extra source files/folders to destination?",
            "您想要把所有备份来源中多余的新文件或文件夹复制到备份目的地吗？",
        )
    }

    pub fn please_acknowledge(&self) -> &'static str {
        self.pick("Please acknowledge the diff", "请知悉这些差异")
    }

    pub fn all_processed(&self) -> &'static str {
        self.pick("All processed", "全部处理完毕")
    }

    pub fn kind_mismatch(&self, source: EntryKind, destination: EntryKind) -> String {
        match self.lang {
            Lang::En => format!(
                "src is {}, dst is {}. Please backup manually.",
                self.kind(source),
                self.kind(destination)
            ),
            Lang::Zh => format!(
                "备份来源是一个{}，但备份目的地现有的是一个{}。请手动备份它。",
                self.kind(source),
                self.kind(destination)
            ),
        }
    }

    pub fn repository_divergent(&self, name: &str) -> String {
        match self.lang {
            Lang::En => format!(
                "Git repo {} is different from destination. Please backup manually.",
                name
            ),
            Lang::Zh => format!("Git代码库 {} 与现有备份不一致。请手动备份它。", name),
        }
    }

    pub fn repository_in_sync(&self, name: &str) -> String {
        match self.lang {
            Lang::En => format!("Git repo {} matches destination, not descending.", name),
            Lang::Zh => format!("Git代码库 {} 与现有备份一致，不再深入比较。", name),
        }
    }

    pub fn size_differs(&self, kind: EntryKind, source: u64, destination: u64) -> String {
        match self.lang {
            Lang::En => format!(
                "{} sizes of src and dst are different: {}B vs {}B",
                self.kind(kind),
                source,
                destination
            ),
            Lang::Zh => format!(
                "备份来源与备份目的地的{}的大小不同：{}B vs {}B",
                self.kind(kind),
                source,
                destination
            ),
        }
    }

    /// Name of the timestamp `mode` compares
    pub fn timestamp(&self, mode: TimeMode) -> &'static str {
        match mode {
            TimeMode::Modified => self.pick("last modified time", "修改时间"),
            TimeMode::Created => self.pick("creation time", "创建时间"),
        }
    }

    pub fn time_differs(
        &self,
        kind: EntryKind,
        mode: TimeMode,
        source: SystemTime,
        destination: SystemTime,
    ) -> String {
        match self.lang {
            Lang::En => format!(
                "{} {} of src and dst are different: {} vs {}",
                self.kind(kind),
                self.timestamp(mode),
                format_time(source),
                format_time(destination)
            ),
            Lang::Zh => format!(
                "{}的{}不同：{} vs {}",
                self.kind(kind),
                self.timestamp(mode),
                format_time(source),
                format_time(destination)
            ),
        }
    }

    pub fn replace_question(&self) -> &'static str {
        self.pick(
            "Would you like to backup? This will override the existing backup.",
            "你是否要备份它？这会替换并覆盖当前已有的备份。",
        )
    }

    pub fn copied(&self, name: &str) -> String {
        format!("{}{}", self.pick("Copied: ", "已复制："), name)
    }

    pub fn replaced(&self, name: &str) -> String {
        format!("{}{}", self.pick("Replaced: ", "已替换："), name)
    }

    pub fn dry_run_banner(&self) -> &'static str {
        self.pick("Running in dry-run mode", "试运行模式已打开")
    }

    pub fn dry_run_tag(&self) -> &'static str {
        self.pick("[DRYRUN]", "[试运行]")
    }

    pub fn quitting(&self) -> &'static str {
        self.pick("Quitting...", "退出……")
    }

    pub fn completed(&self) -> &'static str {
        self.pick(
            "Back up completed. Press Enter to exit...",
            "备份完毕。按回车键退出程序。",
        )
    }

    pub fn aborted(&self) -> &'static str {
        self.pick(
            "Back up aborted. Press Enter to exit...",
            "备份异常中断。按回车键退出程序。",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_english_is_default() {
        let messages = Messages::default();
        assert_eq!(messages.choice(Choice::Yes), "Yes");
        assert_eq!(messages.kind(EntryKind::Symlink), "symlink");
        assert_eq!(messages.dry_run_tag(), "[DRYRUN]");
    }

    #[test]
    fn test_chinese_catalogue() {
        let messages = Messages::new(Lang::Zh);
        assert_eq!(messages.choice(Choice::Acknowledge), "知道了");
        assert_eq!(messages.kind(EntryKind::Folder), "文件夹");
        assert!(messages
            .kind_mismatch(EntryKind::File, EntryKind::Folder)
            .contains("文件夹"));
    }

    #[test]
    fn test_size_message_has_both_sizes() {
        let line = Messages::default().size_differs(EntryKind::File, 3, 12);
        assert_eq!(line, "file sizes of src and dst are different: 3B vs 12B");
    }

    #[test]
    fn test_time_message_format() {
        let a = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let b = a + Duration::from_secs(60);
        let line = Messages::default().time_differs(EntryKind::File, TimeMode::Modified, a, b);
        assert!(line.starts_with("file last modified time of src and dst are different: "));
        assert!(line.contains(" vs "));
        assert_eq!(format_time(a).len(), "2001-09-09 01:46:40".len());
    }

    #[test]
    fn test_time_message_names_compared_timestamp() {
        let a = UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let line = Messages::default().time_differs(EntryKind::Folder, TimeMode::Created, a, a);
        assert!(line.starts_with("folder creation time of src and dst are different: "));

        let line = Messages::new(Lang::Zh).time_differs(EntryKind::File, TimeMode::Created, a, a);
        assert!(line.starts_with("文件的创建时间不同："));
    }

    #[test]
    fn test_kind_mismatch_message() {
        let line = Messages::default().kind_mismatch(EntryKind::Symlink, EntryKind::File);
        assert_eq!(line, "src is symlink, dst is file. Please backup manually.");
    }
}
