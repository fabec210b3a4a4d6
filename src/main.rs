use log::{debug, error};
use std::env;
use std::error::Error;

use kochbuch::{
    load_config, parse, serialize, tokenize, DirectoryLoader, ShoppingListRequest, SynonymTable,
};

const USAGE: &str = "Usage: kochbuch <command> [args]

Commands:
  tokenize <line>                 print the tokens of one markup line as JSON
  parse <file>                    print a recipe as JSON
  format <file>                   print a recipe in normalised markup
  scale <file> <servings>         print a recipe scaled to <servings>
  shopping-list <id>[:servings]…  print the aggregated shopping list as JSON
  list                            list recipes in the recipes directory";

/// `Chili:4` → request for Chili scaled to 4 servings
fn parse_request(arg: &str) -> Result<ShoppingListRequest, Box<dyn Error>> {
    match arg.rsplit_once(':') {
        Some((id, servings)) => {
            let servings: f64 = servings
                .parse()
                .map_err(|_| format!("Invalid servings in '{}'", arg))?;
            if servings <= 0.0 {
                return Err(format!("Servings must be positive in '{}'", arg).into());
            }
            Ok(ShoppingListRequest::with_servings(id, servings))
        }
        None => Ok(ShoppingListRequest::new(arg)),
    }
}

async fn read_recipe(path: Option<&String>) -> Result<kochbuch::Recipe, Box<dyn Error>> {
    let path = path.ok_or("Please provide a recipe file as an argument")?;
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse(&content))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = load_config()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&settings.log_level))
        .init();
    debug!("{:?}", settings);

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).ok_or(USAGE)?;

    match command.as_str() {
        "tokenize" => {
            let line = args.get(2).ok_or("Please provide a line as an argument")?;
            let result = tokenize(line);
            println!("{}", serde_json::to_string_pretty(&result.tokens)?);
            if let Some(open) = result.open_block_comment {
                eprintln!("unclosed block comment: {}", open);
            }
        }
        "parse" => {
            let recipe = read_recipe(args.get(2)).await?;
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }
        "format" => {
            let recipe = read_recipe(args.get(2)).await?;
            println!("{}", serialize(&recipe));
        }
        "scale" => {
            let recipe = read_recipe(args.get(2)).await?;
            let servings: u32 = args
                .get(3)
                .ok_or("Please provide the number of servings")?
                .parse()?;
            println!("{}", serialize(&recipe.scale_to_servings(servings)));
        }
        "shopping-list" => {
            let requests = args[2..]
                .iter()
                .map(|arg| parse_request(arg))
                .collect::<Result<Vec<_>, _>>()?;
            if requests.is_empty() {
                return Err("Please provide at least one recipe id".into());
            }

            let loader = DirectoryLoader::new(&settings.recipes_dir);
            let synonyms = SynonymTable::load(&settings.synonyms_path()).await?;
            match kochbuch::aggregate(&loader, &requests, Some(&synonyms)).await {
                Ok(list) => println!("{}", serde_json::to_string_pretty(&list)?),
                Err(e) => {
                    error!("{}", e);
                    return Err(e.into());
                }
            }
        }
        "list" => {
            let loader = DirectoryLoader::new(&settings.recipes_dir);
            for id in loader.list().await? {
                println!("{}", id);
            }
        }
        other => {
            error!("Unknown command '{}'", other);
            return Err(USAGE.into());
        }
    }

    Ok(())
}
