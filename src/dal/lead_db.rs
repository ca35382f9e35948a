use sqlx::PgPool;

use crate::domain::Lead;

/// Upsert keyed on the content-derived id: a re-scan of the same page
/// overwrites the existing record instead of duplicating it.
pub async fn upsert_lead(pool: &PgPool, lead: &Lead) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        insert into lead
            (id, url, title, snippet, domain, source_query, agent_name, primary_email,
             emails, phones, addresses, contact_name, contact_snippet,
             has_location_signal, has_opportunity_signal, is_important_domain, created_at)
        values
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
        on conflict (id) do update set
            url = excluded.url,
            title = excluded.title,
            snippet = excluded.snippet,
            domain = excluded.domain,
            source_query = excluded.source_query,
            agent_name = excluded.agent_name,
            primary_email = excluded.primary_email,
            emails = excluded.emails,
            phones = excluded.phones,
            addresses = excluded.addresses,
            contact_name = excluded.contact_name,
            contact_snippet = excluded.contact_snippet,
            has_location_signal = excluded.has_location_signal,
            has_opportunity_signal = excluded.has_opportunity_signal,
            is_important_domain = excluded.is_important_domain,
            created_at = excluded.created_at
        "#,
    )
    .bind(&lead.id)
    .bind(&lead.url)
    .bind(&lead.title)
    .bind(&lead.snippet)
    .bind(&lead.domain)
    .bind(&lead.source_query)
    .bind(&lead.agent_name)
    .bind(&lead.primary_email)
    .bind(&lead.emails)
    .bind(&lead.phones)
    .bind(&lead.addresses)
    .bind(&lead.contact_name)
    .bind(&lead.contact_snippet)
    .bind(lead.has_location_signal)
    .bind(lead.has_opportunity_signal)
    .bind(lead.is_important_domain)
    .bind(lead.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// SQLSTATE class 22 (data exception, e.g. value too long) and 54 (program
/// limit exceeded). These mean the record itself is unstorable, so the caller
/// skips it instead of treating the write as an infrastructure failure.
const VALIDATION_SQLSTATE_CLASSES: [&str; 2] = ["22", "54"];

pub fn is_validation_error(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_error) => db_error
            .code()
            .map(|code| {
                VALIDATION_SQLSTATE_CLASSES
                    .iter()
                    .any(|class| code.starts_with(class))
            })
            .unwrap_or(false),
        _ => false,
    }
}
