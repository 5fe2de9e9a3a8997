use clap::Parser;
use meal_planner::config::Command;
use meal_planner::core::export;
use meal_planner::core::{ConfigProvider, Recipe, RecipeDirectory, Storage};
use meal_planner::utils::error::ErrorSeverity;
use meal_planner::utils::{logger, validation::Validate};
use meal_planner::{
    CliConfig, DetachedStorage, LocalStorage, MealDbClient, MealPlanner, PlanStore, PlannerError,
    SlotKey, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI arguments: {:?}", cli);

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let result = match MealDbClient::from_config(&config) {
        Ok(directory) if config.storage_enabled() => {
            let storage = LocalStorage::new(config.data_dir());
            let store = PlanStore::with_key(storage, config.plan_key());
            run(&cli.command, &config, store, directory).await
        }
        Ok(directory) => {
            tracing::warn!("Storage disabled, the plan only lives for this run");
            let store = PlanStore::with_key(DetachedStorage, config.plan_key());
            run(&cli.command, &config, store, directory).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<S: Storage>(
    command: &Command,
    config: &TomlConfig,
    store: PlanStore<S>,
    directory: MealDbClient,
) -> meal_planner::Result<()> {
    let planner =
        MealPlanner::new(store, directory).with_concurrency(config.concurrent_requests());

    match command {
        Command::Plan => {
            let plan = planner.plan().await;
            let calories = planner.calories().await;

            for (day, total) in &calories.per_day {
                println!("{} ({} cal)", day, total);
                for (key, meal) in plan.slots().filter(|(key, _)| key.day == *day) {
                    match meal {
                        Some(meal) => println!(
                            "  {:<10} {} [{}]{}",
                            key.meal_type.to_string(),
                            meal.recipe_name,
                            meal.recipe_id,
                            meal.calories
                                .map(|c| format!(" {} cal", c))
                                .unwrap_or_default()
                        ),
                        None => println!("  {:<10} -", key.meal_type.to_string()),
                    }
                }
            }
        }
        Command::Add { slot, recipe_id } => {
            let key: SlotKey = slot.parse()?;
            let plan = planner.assign(key, recipe_id).await?;
            if let Some(meal) = plan.get(key) {
                println!("✅ {} added to {}", meal.recipe_name, key);
            }
        }
        Command::Remove { slot } => {
            let key: SlotKey = slot.parse()?;
            planner.unassign(key).await;
            println!("🗑️  {} is now empty", key);
        }
        Command::Clear => {
            planner.clear().await;
            println!("🧹 Plan cleared");
        }
        Command::Search {
            name,
            ingredient,
            category,
        } => {
            let directory = planner.directory();
            let recipes = match (name, ingredient, category) {
                (Some(query), _, _) => directory.search_by_name(query).await,
                (_, Some(ingredient), _) => directory.search_by_ingredient(ingredient).await,
                (_, _, Some(category)) => directory.get_by_category(category).await,
                _ => Vec::new(),
            };
            print_recipes(&recipes);
        }
        Command::Random { count } => {
            let count = count.unwrap_or_else(|| config.random_count());
            let recipes = planner.directory().get_random(count).await;
            print_recipes(&recipes);
        }
        Command::Recipe { id } => {
            let recipe = planner.directory().get_by_id(id).await?.ok_or_else(|| {
                PlannerError::DirectoryFetchFailure {
                    recipe_id: id.clone(),
                    message: "recipe not found".to_string(),
                }
            })?;
            print_recipe(&recipe);
        }
        Command::ShoppingList {
            format,
            output,
            check,
        } => {
            let mut list = planner.shopping_list().await;
            for name in check {
                if !list.check_by_name(name) {
                    tracing::warn!("'{}' is not on the shopping list", name);
                }
            }

            if let Some(notification) = list.notification() {
                eprintln!("⚠️  {}", notification);
            }
            if list.is_empty() {
                println!("No recipes in your meal plan yet.");
                return Ok(());
            }

            let rendered = export::render(&list, *format)?;
            match output {
                Some(path) => {
                    tokio::fs::write(path, rendered).await?;
                    println!(
                        "📁 Shopping list ({} items) saved to: {}",
                        list.len(),
                        path.display()
                    );
                }
                None => {
                    println!("{}", rendered);
                    tracing::info!("{} of {} items checked", list.checked_count(), list.len());
                }
            }
        }
        Command::Calories => {
            let summary = planner.calories().await;
            for (day, total) in &summary.per_day {
                println!("{:<10} {:>6} cal", day.to_string(), total);
            }
            println!("Week total: {} cal", summary.week_total);
            println!("Average per day: {} cal", summary.daily_average);
        }
    }

    Ok(())
}

fn print_recipes(recipes: &[Recipe]) {
    if recipes.is_empty() {
        println!("No recipes found.");
        return;
    }
    for recipe in recipes {
        match &recipe.category {
            Some(category) => println!("{:>8}  {} ({})", recipe.id, recipe.name, category),
            None => println!("{:>8}  {}", recipe.id, recipe.name),
        }
    }
}

fn print_recipe(recipe: &Recipe) {
    println!("{} [{}]", recipe.name, recipe.id);
    if let (Some(category), Some(area)) = (&recipe.category, &recipe.area) {
        println!("{} / {}", category, area);
    }
    println!();
    for (ingredient, measure) in recipe.present_ingredients() {
        println!("  - {} {}", measure.trim(), ingredient.trim());
    }
    if let Some(instructions) = &recipe.instructions {
        println!();
        println!("{}", instructions.trim());
    }
}
