//! Seed data for the directory, matching the reference fixture used by the
//! integration tests: five addresses, two category trees, five companies.

use super::DbPool;
use anyhow::Result;
use tracing::info;

const ADDRESSES: &[(i32, &str, f64, f64)] = &[
    (1, "г. Москва, ул. Ленина 1", 55.7558, 37.6173),
    (2, "г. Новосибирск, ул. Блюхера 32/1", 55.0302, 82.9204),
    (3, "г. Санкт-Петербург, Невский проспект 52", 59.934530, 30.336068),
    (4, "г. Санкт-Петербург, Невский проспект 35В", 59.933371, 30.332397),
    (5, "г. Санкт-Петербург, Итальянская улица 7", 59.935183, 30.330026),
];

// Roots first: a child's parent must already exist.
const ACTIVITIES: &[(i32, &str, Option<i32>)] = &[
    (1, "Еда", None),
    (2, "Мясная продукция", Some(1)),
    (3, "Молочная продукция", Some(1)),
    (4, "Автомобили", None),
    (5, "Запчасти", Some(4)),
    (6, "Мойка", Some(4)),
    (7, "Аксессуары", Some(4)),
];

const COMPANIES: &[(i32, &str, i32)] = &[
    (1, "ООО Рога и Копыта", 1),
    (2, "ЗАО Мясокомбинат", 2),
    (3, "Кореана", 3),
    (4, "Гидро", 4),
    (5, "Автостиль", 5),
];

const PHONE_NUMBERS: &[(&str, i32)] = &[
    ("2-222-222", 1),
    ("3-333-333", 1),
    ("8-923-666-13-13", 1),
    ("8-800-555-35-35", 2),
    ("8-800-355-35-55", 3),
    ("8-800-222-35-35", 4),
    ("8-800-111-35-35", 5),
];

const COMPANY_ACTIVITIES: &[(i32, i32)] = &[
    (1, 2), // Рога и Копыта: мясная, молочная
    (1, 3),
    (2, 2), // Мясокомбинат: мясная
    (3, 7), // Кореана: аксессуары, запчасти
    (3, 5),
    (4, 6), // Гидро: мойка
    (5, 7), // Автостиль: аксессуары
];

/// Reset and reload the seed data inside a single transaction. Deletion
/// runs child tables first, insertion parent tables first.
pub async fn load_seed_data(pool: &DbPool) -> Result<()> {
    let mut tx = pool.get_pool().begin().await?;

    sqlx::query("DELETE FROM phone_numbers").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM company_activities").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM companies").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM activities").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM addresses").execute(&mut *tx).await?;

    for (id, address, latitude, longitude) in ADDRESSES {
        sqlx::query(
            "INSERT INTO addresses (id, address, latitude, longitude) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .execute(&mut *tx)
        .await?;
    }

    for (id, name, parent_id) in ACTIVITIES {
        sqlx::query("INSERT INTO activities (id, name, parent_id) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
    }

    for (id, name, address_id) in COMPANIES {
        sqlx::query("INSERT INTO companies (id, name, address_id) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(name)
            .bind(address_id)
            .execute(&mut *tx)
            .await?;
    }

    for (number, company_id) in PHONE_NUMBERS {
        sqlx::query("INSERT INTO phone_numbers (number, company_id) VALUES ($1, $2)")
            .bind(number)
            .bind(company_id)
            .execute(&mut *tx)
            .await?;
    }

    for (company_id, activity_id) in COMPANY_ACTIVITIES {
        sqlx::query("INSERT INTO company_activities (company_id, activity_id) VALUES ($1, $2)")
            .bind(company_id)
            .bind(activity_id)
            .execute(&mut *tx)
            .await?;
    }

    // Explicit ids above bypass the sequences; realign them.
    sqlx::query("SELECT setval('addresses_id_seq', (SELECT MAX(id) FROM addresses))")
        .execute(&mut *tx)
        .await?;
    sqlx::query("SELECT setval('activities_id_seq', (SELECT MAX(id) FROM activities))")
        .execute(&mut *tx)
        .await?;
    sqlx::query("SELECT setval('companies_id_seq', (SELECT MAX(id) FROM companies))")
        .execute(&mut *tx)
        .await?;
    sqlx::query("SELECT setval('phone_numbers_id_seq', (SELECT MAX(id) FROM phone_numbers))")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    info!(
        "Seed data loaded: {} addresses, {} activities, {} companies",
        ADDRESSES.len(),
        ACTIVITIES.len(),
        COMPANIES.len()
    );

    Ok(())
}
