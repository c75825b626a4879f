use std::env;
use std::time::Duration;

use finansehub_powerbi_setup::LogLevel;
use finansehub_powerbi_setup::powerbi::config::SetupConfig;
use finansehub_powerbi_setup::powerbi::setupclient::SetupClient;

const KEY_VAULT_NAME: &str = "kv-finansehub-054";
const MAX_REFRESH_WAIT: Duration = Duration::from_secs(10 * 60);

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    println!("🔄 Setting up Power BI integration for FinanseHub...");

    let config = match SetupConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ Configuration error: {}", e);
            return;
        }
    };

    let mut client = SetupClient::new(config, LogLevel::Information);

    if !client.test_connection().await {
        return;
    }

    match client.workspace_info().await {
        Ok(Some(workspace)) => {
            println!("\n📊 Workspace Info:");
            println!("   Name: {}", workspace.name);
            if let Some(kind) = &workspace.workspace_type {
                println!("   Type: {}", kind);
            }
            if let Some(state) = &workspace.state {
                println!("   State: {}", state);
            }
        }
        Ok(None) => {}
        Err(e) => {
            println!("❌ Power BI setup failed: {}", e);
            return;
        }
    }

    let dataset_id = match client.find_or_create_dataset().await {
        Ok(dataset_id) => dataset_id,
        Err(e) => {
            println!("❌ Power BI setup failed: {}", e);
            return;
        }
    };

    let Some(dataset_id) = dataset_id else {
        println!("❌ Failed to set up Power BI dataset");
        return;
    };

    println!("\n🎉 Power BI setup completed!");
    println!("Dataset ID: {}", dataset_id);
    println!("Workspace ID: {}", client.group_id());
    println!("\n📝 Add this to your Azure Key Vault:");
    println!(
        "az keyvault secret set --vault-name {} --name 'PBI-DATASET-ID' --value '{}'",
        KEY_VAULT_NAME, dataset_id
    );
    println!("\n📊 You can now access your dataset at:");
    println!(
        "https://app.powerbi.com/groups/{}/datasets/{}",
        client.group_id(),
        dataset_id
    );

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|arg| arg == "--refresh") {
        run_refresh(&mut client, &dataset_id, args.iter().any(|arg| arg == "--wait")).await;
    }
}

/// Report recent refresh activity, queue a new refresh and optionally wait
/// for it to finish.
async fn run_refresh(client: &mut SetupClient, dataset_id: &str, wait: bool) {
    println!("\n📊 Getting dataset information...");
    match client.dataset_info(dataset_id).await {
        Ok(Some(dataset)) => {
            println!("📈 Dataset: {}", dataset.name);
            println!(
                "📅 Configure URL: https://app.powerbi.com/groups/{}/datasets/{}/details",
                client.group_id(),
                dataset_id
            );
        }
        Ok(None) => {}
        Err(e) => {
            println!("❌ Failed to get dataset info: {}", e);
            return;
        }
    }

    println!("\n📜 Checking refresh history...");
    match client.refresh_history(dataset_id, 5).await {
        Ok(refreshes) => {
            if let Some(latest) = refreshes.first() {
                if let Some(start) = latest.start_time {
                    println!("📅 Last refresh: {}", start);
                }
                println!("⚡ Status: {}", latest.status);
                match latest.duration_secs() {
                    Some(secs) => println!("⏱️  Duration: {} seconds", secs),
                    None => println!("⏱️  Duration: In progress..."),
                }
            } else {
                println!("📭 No previous refreshes found");
            }
        }
        Err(e) => {
            println!("❌ Failed to check refresh history: {}", e);
            return;
        }
    }

    println!("\n🔄 Triggering dataset refresh...");
    match client.trigger_refresh(dataset_id).await {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            println!("❌ Failed to trigger refresh: {}", e);
            return;
        }
    }

    if wait {
        client.wait_for_refresh(dataset_id, MAX_REFRESH_WAIT).await;
    } else {
        println!("\n💡 Use --wait flag to monitor refresh completion");
        println!(
            "🔗 Or check status at: https://app.powerbi.com/groups/{}/datasets/{}/details",
            client.group_id(),
            dataset_id
        );
    }
}
