//! Database seeder for Kopra development and testing.
//!
//! Seeds a demo cooperative with staff users, members, products, and an
//! opening savings deposit, going through the repositories so every
//! record is created exactly the way the API creates it.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use kopra_db::entities::users;
use kopra_db::repositories::cooperative::{CooperativeRepository, RegisterCooperativeInput};
use kopra_db::repositories::member::{CreateMemberInput, MemberRepository};
use kopra_db::repositories::product::{CreateProductInput, ProductRepository};
use kopra_db::repositories::savings::{SavingsInput, SavingsRepository};
use kopra_db::repositories::user::{CreateUserInput, UserRepository};
use kopra_core::savings::SavingsType;
use kopra_shared::Role;

const ADMIN_USERNAME: &str = "admin";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = kopra_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    if users::Entity::find()
        .filter(users::Column::Username.eq(ADMIN_USERNAME))
        .one(&db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("Demo cooperative already seeded, nothing to do.");
        return;
    }

    println!("Seeding demo cooperative...");
    let cooperative_id = seed_cooperative(&db).await;

    println!("Seeding staff users...");
    seed_staff(&db, cooperative_id).await;

    println!("Seeding members...");
    let member_id = seed_members(&db, cooperative_id).await;

    println!("Seeding products...");
    seed_products(&db, cooperative_id).await;

    println!("Seeding an opening deposit...");
    seed_opening_deposit(&db, cooperative_id, member_id).await;

    println!("Seeding complete!");
    println!("  Staff login:  {ADMIN_USERNAME} / admin12345");
    println!("  Portal login: AGT-0001 / 123456 (cooperative {cooperative_id})");
}

/// Registers the demo cooperative with its admin and default chart.
async fn seed_cooperative(db: &DatabaseConnection) -> sea_orm::prelude::Uuid {
    let repo = CooperativeRepository::new(db.clone());
    let (cooperative, _admin) = repo
        .register(RegisterCooperativeInput {
            name: "Koperasi Maju Bersama".to_string(),
            address: Some("Jl. Merdeka No. 1, Bandung".to_string()),
            phone: Some("+62-22-555-0101".to_string()),
            email: Some("pengurus@majubersama.example".to_string()),
            admin_username: ADMIN_USERNAME.to_string(),
            admin_password: "admin12345".to_string(),
            admin_name: "Administrator".to_string(),
        })
        .await
        .expect("Failed to register demo cooperative");

    println!("  Created cooperative: {}", cooperative.name);
    cooperative.id
}

/// Creates a treasurer and a cashier.
async fn seed_staff(db: &DatabaseConnection, cooperative_id: sea_orm::prelude::Uuid) {
    let repo = UserRepository::new(db.clone());

    for (username, name, role) in [
        ("bendahara", "Siti Rahayu", Role::Treasurer),
        ("kasir", "Budi Santoso", Role::Cashier),
    ] {
        repo.create_user(
            cooperative_id,
            CreateUserInput {
                username: username.to_string(),
                password: format!("{username}12345"),
                name: name.to_string(),
                role,
            },
        )
        .await
        .expect("Failed to create staff user");
        println!("  Created {role} user: {username}");
    }
}

/// Registers three demo members and sets a portal PIN on the first.
async fn seed_members(
    db: &DatabaseConnection,
    cooperative_id: sea_orm::prelude::Uuid,
) -> sea_orm::prelude::Uuid {
    let repo = MemberRepository::new(db.clone());
    let join_date = Utc::now().date_naive();
    let mut first = None;

    for (name, phone) in [
        ("Andi Wijaya", "+62-812-5550-0001"),
        ("Dewi Lestari", "+62-812-5550-0002"),
        ("Rudi Hartono", "+62-812-5550-0003"),
    ] {
        let member = repo
            .create_member(
                cooperative_id,
                CreateMemberInput {
                    name: name.to_string(),
                    national_id: None,
                    phone: Some(phone.to_string()),
                    address: None,
                    join_date,
                },
            )
            .await
            .expect("Failed to create member");
        println!("  Created member {}: {}", member.member_number, member.name);
        first.get_or_insert(member.id);
    }

    let first = first.expect("At least one member was seeded");
    repo.set_pin(cooperative_id, first, "123456")
        .await
        .expect("Failed to set portal PIN");
    first
}

/// Stocks the member store with a few products.
async fn seed_products(db: &DatabaseConnection, cooperative_id: sea_orm::prelude::Uuid) {
    let repo = ProductRepository::new(db.clone());

    let products = [
        ("Beras 5kg", Some("8991002100015"), dec!(68000), dec!(62000), 40),
        ("Minyak Goreng 1L", Some("8991002100022"), dec!(18500), dec!(16000), 60),
        ("Gula Pasir 1kg", Some("8991002100039"), dec!(14500), dec!(12800), 50),
        ("Teh Celup 25s", None, dec!(9500), dec!(7800), 30),
    ];

    for (name, barcode, selling_price, cost_price, stock) in products {
        repo.create_product(
            cooperative_id,
            CreateProductInput {
                name: name.to_string(),
                barcode: barcode.map(str::to_string),
                selling_price,
                cost_price,
                stock,
                low_stock_threshold: 5,
            },
        )
        .await
        .expect("Failed to create product");
        println!("  Created product: {name}");
    }
}

/// Records the first member's principal deposit so the ledger has a
/// posted entry out of the box.
async fn seed_opening_deposit(
    db: &DatabaseConnection,
    cooperative_id: sea_orm::prelude::Uuid,
    member_id: sea_orm::prelude::Uuid,
) {
    let admin = users::Entity::find()
        .filter(users::Column::Username.eq(ADMIN_USERNAME))
        .one(db)
        .await
        .expect("Failed to look up admin")
        .expect("Admin user was seeded");

    let repo = SavingsRepository::new(db.clone());
    let transaction = repo
        .record_deposit(
            cooperative_id,
            admin.id,
            SavingsInput {
                member_id,
                savings_type: SavingsType::Principal,
                amount: dec!(100000),
                date: Utc::now().date_naive(),
                note: Some("Opening principal deposit".to_string()),
            },
        )
        .await
        .expect("Failed to record opening deposit");
    println!("  Recorded deposit {}", transaction.reference_number);
}
