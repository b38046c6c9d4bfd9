//! CSV import and export of the question bank.

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;

use super::queries::categories::{get_all_categories, upsert_category};
use super::queries::questions::{get_all_questions, upsert_question};
use super::{Category, Question};

const CATEGORIES_FILE: &str = "categories.csv";
const QUESTIONS_FILE: &str = "questions.csv";

fn write_to(path: &Path, data: &[impl Serialize]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Cannot create {}", path.display()))?;
    let mut wtr = csv::Writer::from_writer(file);
    for line in data {
        wtr.serialize(line)?;
    }
    wtr.flush()?;
    Ok(())
}

fn read_from<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        let record: T = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        out.push(record);
    }
    Ok(out)
}

pub async fn export_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories = get_all_categories(pool).await?;
    let questions = get_all_questions(pool).await?;
    if !dir.exists() {
        std::fs::create_dir_all(dir)?
    }
    write_to(&dir.join(CATEGORIES_FILE), &categories)?;
    write_to(&dir.join(QUESTIONS_FILE), &questions)?;
    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Exported data to {}",
        dir.display()
    );
    Ok(())
}

/// Upserts every row by id. Nothing is written unless both files parse and every row
/// is stored.
pub async fn import_data(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let categories: Vec<Category> = read_from(&dir.join(CATEGORIES_FILE))?;
    let questions: Vec<Question> = read_from(&dir.join(QUESTIONS_FILE))?;

    let mut tx = pool.begin().await?;
    for category in &categories {
        upsert_category(&mut *tx, category).await?;
    }
    for question in &questions {
        upsert_question(&mut *tx, question).await?;
    }
    tx.commit().await?;

    tracing::info!(
        categories = categories.len(),
        questions = questions.len(),
        "Imported data from {}",
        dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, queries::questions::create_question, NewQuestion};

    async fn migrated_pool() -> SqlitePool {
        let pool = db::in_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn exported_bank_imports_into_fresh_database() {
        let source = migrated_pool().await;
        let new = NewQuestion {
            question: "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?"
                .to_owned(),
            answer: "Maya Angelou".to_owned(),
            category: 4,
            difficulty: 2,
        };
        create_question(&source, &new).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        export_data(&source, dir.path()).await.unwrap();

        let target = migrated_pool().await;
        import_data(&target, dir.path()).await.unwrap();
        import_data(&target, dir.path()).await.unwrap();

        let questions = get_all_questions(&target).await.unwrap();
        assert_eq!(questions, get_all_questions(&source).await.unwrap());
        assert_eq!(get_all_categories(&target).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn malformed_file_leaves_database_untouched() {
        let pool = migrated_pool().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATEGORIES_FILE), "id,type\n7,Music\n").unwrap();
        std::fs::write(
            dir.path().join(QUESTIONS_FILE),
            "id,question,answer,category,difficulty\nnot-a-number,q,a,1,1\n",
        )
        .unwrap();

        assert!(import_data(&pool, dir.path()).await.is_err());
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 6);
    }
}
