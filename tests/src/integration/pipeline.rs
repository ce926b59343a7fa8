//! # End-to-End Pipeline Tests
//!
//! Full node lifecycle against the in-process cluster: connect, authenticate,
//! dispatch both input channels, and republish only validated traffic.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{
        get_message, node_config, put_message, trusted_cluster,
    };
    use cluster_client::{InMemoryCluster, SubscribeOptions, Transport};
    use std::sync::Arc;
    use std::time::Duration;
    use suppressor::{StructuralSuppressor, Suppressor};
    use tokio::time::timeout;
    use validator_node::WireValidator;
    use wire_types::{validated_channel, WireMessage, GET_CHANNEL, PUT_CHANNEL};

    /// Spawn a full node against the given cluster and wait for it to
    /// finish the handshake.
    async fn running_node(cluster: &Arc<InMemoryCluster>) -> tokio::task::JoinHandle<()> {
        let node = WireValidator::new(
            &node_config(),
            Arc::clone(cluster) as Arc<dyn Transport>,
            Arc::new(StructuralSuppressor::new()) as Arc<dyn Suppressor>,
        )
        .unwrap();

        let handle = tokio::spawn(async move {
            let _ = node.run().await;
        });

        await_authenticated(cluster).await;
        handle
    }

    async fn await_authenticated(cluster: &Arc<InMemoryCluster>) {
        timeout(Duration::from_secs(2), async {
            while !cluster.authenticated()
                || cluster.subscriber_count(PUT_CHANNEL) == 0
                || cluster.subscriber_count(GET_CHANNEL) == 0
            {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
    }

    async fn expect_message(
        subscription: &mut cluster_client::ChannelSubscription,
    ) -> WireMessage {
        timeout(Duration::from_secs(1), subscription.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_put_republished_unmodified() {
        let cluster = trusted_cluster();
        let _node = running_node(&cluster).await;

        let mut validated = cluster
            .subscribe(&validated_channel(PUT_CHANNEL), SubscribeOptions::default())
            .await
            .unwrap();

        let message = put_message("user/alice", "name", "alice");
        cluster.publish(PUT_CHANNEL, message.clone()).await;

        let delivered = expect_message(&mut validated).await;
        assert_eq!(delivered.payload(), message.payload());
    }

    #[tokio::test]
    async fn test_valid_get_republished_unmodified() {
        let cluster = trusted_cluster();
        let _node = running_node(&cluster).await;

        let mut validated = cluster
            .subscribe(&validated_channel(GET_CHANNEL), SubscribeOptions::default())
            .await
            .unwrap();

        let message = get_message("user/alice");
        cluster.publish(GET_CHANNEL, message.clone()).await;

        let delivered = expect_message(&mut validated).await;
        assert_eq!(delivered.payload(), message.payload());
    }

    #[tokio::test]
    async fn test_rejected_put_never_republished() {
        let cluster = trusted_cluster();
        let _node = running_node(&cluster).await;

        let mut validated = cluster
            .subscribe(&validated_channel(PUT_CHANNEL), SubscribeOptions::default())
            .await
            .unwrap();

        // Empty put body fails structural validation.
        cluster
            .publish(PUT_CHANNEL, WireMessage::new(serde_json::json!({ "put": {} })))
            .await;
        // A valid write behind it still flows through.
        let good = put_message("user/bob", "name", "bob");
        cluster.publish(PUT_CHANNEL, good.clone()).await;

        let delivered = expect_message(&mut validated).await;
        assert_eq!(delivered.payload(), good.payload());
        assert!(matches!(validated.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_puts_republished_in_submission_order() {
        let cluster = trusted_cluster();
        let _node = running_node(&cluster).await;

        let mut validated = cluster
            .subscribe(&validated_channel(PUT_CHANNEL), SubscribeOptions::default())
            .await
            .unwrap();

        let messages: Vec<WireMessage> = (0..5)
            .map(|i| put_message(&format!("node/{i}"), "seq", &i.to_string()))
            .collect();
        for message in &messages {
            cluster.publish(PUT_CHANNEL, message.clone()).await;
        }

        for expected in &messages {
            let delivered = expect_message(&mut validated).await;
            assert_eq!(delivered.payload(), expected.payload());
        }
    }

    #[tokio::test]
    async fn test_pipeline_survives_reconnect() {
        let cluster = trusted_cluster();
        let _node = running_node(&cluster).await;
        let first_session = cluster.session_id().unwrap();

        cluster.drop_connection("broker restart");

        // The supervisor backs off, reconnects, and re-authenticates with a
        // challenge bound to the new session.
        await_authenticated(&cluster).await;
        let second_session = cluster.session_id().unwrap();
        assert_ne!(first_session.as_str(), second_session.as_str());

        // Give the fresh dispatch epoch a moment to finish resubscribing.
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut validated = cluster
            .subscribe(&validated_channel(PUT_CHANNEL), SubscribeOptions::default())
            .await
            .unwrap();
        let message = put_message("user/carol", "name", "carol");
        cluster.publish(PUT_CHANNEL, message.clone()).await;

        let delivered = expect_message(&mut validated).await;
        assert_eq!(delivered.payload(), message.payload());
    }
}
