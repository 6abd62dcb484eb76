//! `sapcli gcts log`

use anyhow::Result;
use clap::Args;

use sapcli::gcts::repository::Commit;
use sapcli::gcts::simple;

use super::Context;

/// git log
#[derive(Args, Debug)]
pub struct LogArgs {
    /// Repository name
    pub package: String,
}

/// Execute the `gcts log` command.
pub fn execute(args: LogArgs, ctx: &Context) -> Result<()> {
    let commits =
        simple::log(ctx.conn, args.package.as_str().into()).map_err(|err| ctx.report(err))?;

    for line in format_commits(&commits) {
        println!("{}", line);
    }

    Ok(())
}

fn format_commits(commits: &[Commit]) -> Vec<String> {
    let mut lines = Vec::new();

    for (index, commit) in commits.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(format!("commit {}", commit.id));
        lines.push(format!("Author: {} <{}>", commit.author, commit.author_mail));
        lines.push(format!("Date:   {}", commit.date));
        lines.push(String::new());
        lines.push(format!("    {}", commit.message));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str, message: &str) -> Commit {
        Commit {
            id: id.to_string(),
            author: "Jane Doe".to_string(),
            author_mail: "jane@example.com".to_string(),
            date: "2024-01-02 10:00:00".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_format_commits() {
        let lines = format_commits(&[commit("abc", "Second"), commit("def", "First")]);
        assert_eq!(
            lines,
            vec![
                "commit abc",
                "Author: Jane Doe <jane@example.com>",
                "Date:   2024-01-02 10:00:00",
                "",
                "    Second",
                "",
                "commit def",
                "Author: Jane Doe <jane@example.com>",
                "Date:   2024-01-02 10:00:00",
                "",
                "    First",
            ]
        );
    }

    #[test]
    fn test_format_no_commits() {
        assert!(format_commits(&[]).is_empty());
    }
}
