//! Non-interactive subcommands. Output goes to stdout, logs to stderr.

use color_eyre::Result;
use color_eyre::eyre::eyre;
use services::AppServices;
use ui::ViewState;
use ui::vm::{
    LoginAction, LoginMessage, LoginVm, QuestionEditorVm, QuestionRowVm, RankingRowVm, RankingVm,
};

use crate::cli::{Credentials, QuestionFields, QuestionsCommand};

pub async fn ranking(services: &AppServices, limit: Option<usize>) -> Result<()> {
    let ranking = services.ranking();
    let limit = limit.unwrap_or_else(|| ranking.default_limit());
    let mut vm = RankingVm::new();
    vm.load(&ranking, limit).await;

    match vm.rows() {
        ViewState::Ready(rows) => {
            println!("{}", RankingVm::title(limit));
            print!("{}", render_ranking(rows));
            Ok(())
        }
        ViewState::Error(err) => Err(eyre!("{err}")),
        ViewState::Idle | ViewState::Loading => Ok(()),
    }
}

pub async fn authenticate(
    services: &AppServices,
    credentials: Credentials,
    action: LoginAction,
) -> Result<()> {
    let mut vm = LoginVm::new();
    vm.email = credentials.email;
    vm.password = credentials.password;
    let identity = vm
        .submit(&services.auth(), action)
        .await
        .map_err(|err| eyre!("{err}"))?
        .clone();

    if let Some(LoginMessage::Ok(message)) = vm.message() {
        println!("{message}");
    }
    println!(
        "{} (user #{}, {})",
        identity.display_name(),
        identity.user_id(),
        identity.email()
    );
    Ok(())
}

pub async fn questions(services: &AppServices, command: QuestionsCommand) -> Result<()> {
    let service = services.questions();
    let mut vm = QuestionEditorVm::new();
    vm.load(&service).await;
    if let ViewState::Error(err) = vm.questions() {
        return Err(eyre!("{err}"));
    }

    match command {
        QuestionsCommand::List { search } => {
            vm.set_query(search.unwrap_or_default());
            print!("{}", render_questions(&vm.rows()));
        }
        QuestionsCommand::Add(fields) => {
            if fields.options.len() != 4 {
                return Err(eyre!("add needs exactly four --option values"));
            }
            vm.start_create();
            apply_fields(&mut vm, fields);
            let question = vm.submit(&service).await.map_err(|err| eyre!("{err}"))?;
            println!("created question #{}", question.id());
        }
        QuestionsCommand::Edit { id, fields } => {
            if !fields.options.is_empty() && fields.options.len() != 4 {
                return Err(eyre!("edit takes either no --option or exactly four"));
            }
            vm.start_edit(id).map_err(|err| eyre!("{err}"))?;
            apply_fields(&mut vm, fields);
            let question = vm.submit(&service).await.map_err(|err| eyre!("{err}"))?;
            println!("updated question #{}", question.id());
        }
        QuestionsCommand::Delete { id } => {
            vm.delete(&service, id).await.map_err(|err| eyre!("{err}"))?;
            println!("deleted question #{id}");
        }
    }
    Ok(())
}

fn apply_fields(vm: &mut QuestionEditorVm, fields: QuestionFields) {
    if let Some(text) = fields.text {
        vm.set_text(text);
    }
    for (index, option) in fields.options.into_iter().enumerate() {
        vm.set_option(index, option);
    }
    if let Some(correct) = fields.correct {
        vm.set_correct_index(correct);
    }
    if let Some(explanation) = fields.explanation {
        vm.set_explanation(explanation);
    }
}

fn render_ranking(rows: &[RankingRowVm]) -> String {
    if rows.is_empty() {
        return "no scores yet\n".to_string();
    }
    let width = rows.iter().map(|r| r.user.chars().count()).max().unwrap_or(4).max(4);
    let mut out = format!("{:<4}  {:<width$}  {:>5}\n", "POS", "USER", "SCORE");
    for row in rows {
        out.push_str(&format!(
            "{:<4}  {:<width$}  {:>5}\n",
            row.badge, row.user, row.score
        ));
    }
    out
}

fn render_questions(rows: &[QuestionRowVm]) -> String {
    if rows.is_empty() {
        return "no questions found\n".to_string();
    }
    let mut out = String::new();
    for row in rows {
        let id = row.id.map_or_else(|| "-".to_string(), |id| id.value().to_string());
        out.push_str(&format!("#{id:<5} {}\n       answer: {}\n", row.text, row.answer));
        if let Some(problem) = &row.problem {
            out.push_str(&format!("       malformed: {problem}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;

    #[test]
    fn ranking_table_aligns_columns() {
        let rows = vec![
            RankingRowVm {
                position: 1,
                badge: "#1".into(),
                user: "ana@example.com".into(),
                score: 12,
            },
            RankingRowVm {
                position: 2,
                badge: "#2".into(),
                user: "bo".into(),
                score: 3,
            },
        ];
        let table = render_ranking(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("#1    ana@example.com"));
        assert!(lines[2].ends_with("    3"));
        assert_eq!(render_ranking(&[]), "no scores yet\n");
    }

    #[test]
    fn question_rows_show_answer() {
        let rows = vec![QuestionRowVm {
            id: Some(QuestionId::new(3)),
            text: "2 + 2?".into(),
            answer: "B) 4".into(),
            option_count: 4,
            problem: None,
        }];
        assert_eq!(render_questions(&rows), "#3     2 + 2?\n       answer: B) 4\n");
    }

    #[test]
    fn malformed_rows_are_flagged() {
        let rows = vec![QuestionRowVm {
            id: None,
            text: "Orphan".into(),
            answer: String::new(),
            option_count: 1,
            problem: Some("question has no id".into()),
        }];
        assert_eq!(
            render_questions(&rows),
            "#-     Orphan\n       answer: \n       malformed: question has no id\n"
        );
    }
}
