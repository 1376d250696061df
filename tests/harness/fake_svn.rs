use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// A shell script standing in for the `svn` client.
///
/// `list` prints `listing.xml` from its directory; `export` writes a marker
/// line naming the exported URL to the destination. Dropping `list_fail` or
/// `export_fail` files next to the script makes the matching command fail.
pub(crate) struct FakeSvn {
    pub dir: PathBuf,
    pub program: PathBuf,
    pub log_file: PathBuf,
}

impl FakeSvn {
    pub(crate) fn install(dir: &Path) -> Self {
        fs::create_dir_all(dir).expect("Failed to create fake svn dir");
        let program = dir.join("svn");
        let log_file = dir.join("svn.log");

        let script = format!(
            r#"#!/bin/sh
DIR="{dir}"
echo "$@" >> "$DIR/svn.log"

case "$1" in
    list)
        if [ -f "$DIR/list_fail" ]; then
            echo "svn: E170013: Unable to connect to a repository" >&2
            exit 1
        fi
        cat "$DIR/listing.xml"
        ;;
    export)
        for arg in "$@"; do
            URL="$DEST"
            DEST="$arg"
        done
        if [ -f "$DIR/export_fail" ]; then
            echo "partial" > "$DEST"
            echo "svn: E170000: URL '$URL' doesn't exist" >&2
            exit 1
        fi
        echo "exported $URL" > "$DEST"
        ;;
    *)
        echo "unsupported svn command: $1" >&2
        exit 2
        ;;
esac
"#,
            dir = dir.display()
        );

        fs::write(&program, script).expect("Failed to write fake svn script");
        let mut perms = fs::metadata(&program).expect("Failed to get metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&program, perms).expect("Failed to set permissions");

        Self { dir: dir.to_path_buf(), program, log_file }
    }

    /// Write the `svn list --xml` document for `(kind, name, date)` entries.
    pub(crate) fn set_listing(&self, entries: &[(&str, &str, Option<&str>)]) {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<lists>\n<list\n   path=\"https://svn.example.com/repo/configs\">\n",
        );
        for (revision, (kind, name, date)) in entries.iter().enumerate() {
            xml.push_str(&format!("<entry\n   kind=\"{}\">\n<name>{}</name>\n", kind, name));
            if let Some(date) = date {
                xml.push_str(&format!(
                    "<commit\n   revision=\"{}\">\n<author>jdoe</author>\n<date>{}</date>\n</commit>\n",
                    revision + 1,
                    date
                ));
            }
            xml.push_str("</entry>\n");
        }
        xml.push_str("</list>\n</lists>\n");
        self.set_raw_listing(&xml);
    }

    pub(crate) fn set_raw_listing(&self, content: &str) {
        fs::write(self.dir.join("listing.xml"), content).expect("Failed to write listing");
    }

    pub(crate) fn fail_list(&self) {
        fs::write(self.dir.join("list_fail"), "").expect("Failed to write marker");
    }

    pub(crate) fn fail_export(&self) {
        fs::write(self.dir.join("export_fail"), "").expect("Failed to write marker");
    }

    pub(crate) fn log(&self) -> String {
        fs::read_to_string(&self.log_file).unwrap_or_default()
    }
}
