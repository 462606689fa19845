use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use inquire::Confirm;
use std::path::PathBuf;
use vitrine_catalog::{CatalogStore, Product, ProductCreateInput};
use vitrine_cli::error::AppResult;

#[derive(Subcommand)]
pub enum ProductsCommands {
    /// List all products
    List,
    /// Show product details
    Show {
        /// Product ID to show
        id: u64,
    },
    /// Add a new product
    Add {
        /// Unique product code
        #[arg(short, long)]
        code: String,
        /// Product title
        #[arg(short, long)]
        title: String,
        /// Product description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Unit price
        #[arg(short, long, default_value_t = 0.0)]
        price: f64,
        /// Units in stock
        #[arg(short, long, default_value_t = 0)]
        stock: i64,
        /// Product category
        #[arg(long, default_value = "")]
        category: String,
        /// Thumbnail path (repeatable)
        #[arg(long = "thumbnail")]
        thumbnails: Vec<String>,
    },
    /// Delete a product
    Delete {
        /// Product ID to delete
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_products_command(
    command: ProductsCommands,
    catalog_path: PathBuf,
) -> AppResult<()> {
    let store = CatalogStore::load(catalog_path).await;

    match command {
        ProductsCommands::List => list_products(&store).await,
        ProductsCommands::Show { id } => show_product(&store, id).await,
        ProductsCommands::Add {
            code,
            title,
            description,
            price,
            stock,
            category,
            thumbnails,
        } => {
            let input = ProductCreateInput {
                title,
                description,
                code,
                price,
                status: None,
                stock,
                category,
                thumbnails,
            };
            add_product(&store, input).await
        }
        ProductsCommands::Delete { id, yes } => delete_product(&store, id, yes).await,
    }
}

async fn list_products(store: &CatalogStore) -> AppResult<()> {
    let products = store.get_all().await;

    if products.is_empty() {
        println!("{}", "No products found".yellow());
        println!("{}", "Use 'vitrine products add' to create your first product".dimmed());
        return Ok(());
    }

    println!("{}", "Vitrine Catalog".blue().bold());
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        "ID", "Code", "Title", "Category", "Price", "Stock", "Status",
    ]);

    for product in &products {
        table.add_row(vec![
            product.id.to_string(),
            product.code.clone(),
            truncate(&product.title, 30),
            truncate(&product.category, 20),
            format!("{:.2}", product.price),
            product.stock.to_string(),
            status_text(product.status).to_string(),
        ]);
    }

    println!("{}", table);
    println!("Total: {} products", products.len().to_string().cyan());

    Ok(())
}

async fn show_product(store: &CatalogStore, id: u64) -> AppResult<()> {
    match store.get_by_id(id).await {
        Some(product) => {
            println!("{}", format!("Product Details - {}", product.title).blue().bold());
            println!();
            print_product_details(&product);
            Ok(())
        }
        None => Err(vitrine_catalog::CatalogError::NotFound(id).into()),
    }
}

async fn add_product(store: &CatalogStore, input: ProductCreateInput) -> AppResult<()> {
    let product = store.add_product(input).await?;

    println!(
        "{}",
        format!("Product '{}' created with ID {}", product.title, product.id).green()
    );
    println!();
    print_product_details(&product);

    Ok(())
}

async fn delete_product(store: &CatalogStore, id: u64, skip_confirmation: bool) -> AppResult<()> {
    let product = store
        .get_by_id(id)
        .await
        .ok_or(vitrine_catalog::CatalogError::NotFound(id))?;

    println!("{}", format!("Delete Product - {}", product.title).red().bold());
    println!();
    print_product_details(&product);
    println!();

    let confirmed = if skip_confirmation {
        true
    } else {
        Confirm::new(&format!("Are you sure you want to delete '{}'?", product.title))
            .with_default(false)
            .prompt()
            .map_err(vitrine_cli::error::AppError::internal)?
    };

    if confirmed {
        store.delete_product(id).await?;
        println!(
            "{}",
            format!("Product '{}' deleted successfully!", product.title).green()
        );
    } else {
        println!("{}", "Operation cancelled".yellow());
    }

    Ok(())
}

fn print_product_details(product: &Product) {
    println!("{:<15} {}", "ID:".cyan(), product.id);
    println!("{:<15} {}", "Code:".cyan(), product.code);
    println!("{:<15} {}", "Title:".cyan(), product.title);

    if !product.description.trim().is_empty() {
        println!("{:<15} {}", "Description:".cyan(), product.description);
    }

    println!("{:<15} {}", "Category:".cyan(), product.category);
    println!("{:<15} {:.2}", "Price:".cyan(), product.price);
    println!("{:<15} {}", "Stock:".cyan(), product.stock);

    let status_colored = if product.status {
        status_text(true).green()
    } else {
        status_text(false).yellow()
    };
    println!("{:<15} {}", "Status:".cyan(), status_colored);

    if !product.thumbnails.is_empty() {
        println!("{:<15} {}", "Thumbnails:".cyan(), product.thumbnails.join(", "));
    }
}

fn status_text(active: bool) -> &'static str {
    if active {
        "Active"
    } else {
        "Inactive"
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
