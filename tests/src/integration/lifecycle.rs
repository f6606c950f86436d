//! # Registry Lifecycle Flows
//!
//! End-to-end scenarios against live in-memory collaborators: several
//! device users, a carrier SIM account, per-user VoIP apps, and the
//! user-chosen defaults.

#[cfg(test)]
mod tests {
    use crate::init_test_logging;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tc_account_registry::test_utils::{
        call_provider_account, connection_manager_account, test_handle, RegistryHarness,
    };
    use tc_account_registry::{
        capability, MutationOutcome, PhoneAccount, RegistryListener, UserScope,
    };

    const SECONDARY: UserScope = UserScope::new(10);

    fn telephony_account() -> PhoneAccount {
        PhoneAccount::builder(test_handle("com.carrier.telephony", "sim0", UserScope::ROOT))
            .capabilities(
                capability::CALL_PROVIDER
                    | capability::SIM_SUBSCRIPTION
                    | capability::MULTI_USER,
            )
            .address("tel:+15551234567")
            .supported_uri_scheme("tel")
            .supported_uri_scheme("voicemail")
            .label("Carrier")
            .build()
    }

    #[test]
    fn multi_user_device_sees_scoped_and_shared_accounts() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let h = RegistryHarness::new(dir.path().join("state.bin"));
        h.scopes.add_scope(SECONDARY, 100);

        // The carrier SIM account is shared across users; each user also
        // has a private VoIP account.
        h.install_and_register(telephony_account());
        h.install_and_register(call_provider_account("com.voip.root", "acct", UserScope::ROOT));
        h.install_and_register(call_provider_account("com.voip.second", "acct", SECONDARY));

        let sim = test_handle("com.carrier.telephony", "sim0", UserScope::ROOT);
        let root_voip = test_handle("com.voip.root", "acct", UserScope::ROOT);
        let second_voip = test_handle("com.voip.second", "acct", SECONDARY);
        h.registry.set_enabled(&root_voip, true);
        h.registry.set_enabled(&second_voip, true);

        assert_eq!(
            h.registry.all_handles(&UserScope::ROOT),
            vec![sim.clone(), root_voip.clone()]
        );

        h.registry.set_current_scope(Some(SECONDARY));
        assert_eq!(
            h.registry.all_handles(&SECONDARY),
            vec![sim.clone(), second_voip.clone()]
        );
        assert!(!h.registry.all_handles(&SECONDARY).contains(&root_voip));

        // The SIM account is the only tel provider for the secondary user
        // besides their VoIP app, so the scheme default is ambiguous until
        // the user picks.
        assert_eq!(h.registry.default_outgoing_for_scheme("tel", &SECONDARY), None);
        assert_eq!(
            h.registry.set_default_outgoing(Some(sim.clone())),
            MutationOutcome::Committed
        );
        assert_eq!(
            h.registry.default_outgoing_for_scheme("tel", &SECONDARY),
            Some(sim)
        );
    }

    #[test]
    fn register_default_uninstall_flow() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let h = RegistryHarness::new(dir.path().join("state.bin"));

        h.install_and_register(call_provider_account("com.voip.app", "acct", UserScope::ROOT));
        let handle = test_handle("com.voip.app", "acct", UserScope::ROOT);
        h.registry.set_enabled(&handle, true);
        assert!(h.registry.all_handles(&UserScope::ROOT).contains(&handle));

        h.registry.set_default_outgoing(Some(handle.clone()));
        assert_eq!(
            h.registry.default_outgoing_for_scheme("tel", &UserScope::ROOT),
            Some(handle.clone())
        );

        h.registry.clear_by_owner("com.voip.app", &UserScope::ROOT);
        assert!(!h.registry.all_handles(&UserScope::ROOT).contains(&handle));
        assert_eq!(
            h.registry.default_outgoing_for_scheme("tel", &UserScope::ROOT),
            None
        );
    }

    #[test]
    fn sim_selection_updates_voice_subscription() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let h = RegistryHarness::new(dir.path().join("state.bin"));

        h.install_and_register(telephony_account());
        let sim = test_handle("com.carrier.telephony", "sim0", UserScope::ROOT);
        h.subscriptions.set_subscription_id(&sim, 42);

        h.registry.set_default_outgoing(Some(sim.clone()));
        assert_eq!(h.subscriptions.default_voice(), Some(42));

        h.subscriptions.set_default_sms(42);
        assert!(h.registry.is_user_selected_sms_account(&sim, &UserScope::ROOT));
    }

    #[test]
    fn uninstalling_an_app_for_one_user_leaves_the_other() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let h = RegistryHarness::new(dir.path().join("state.bin"));
        h.scopes.add_scope(SECONDARY, 100);

        h.install_and_register(call_provider_account("com.voip.app", "acct", UserScope::ROOT));
        h.install_and_register(call_provider_account("com.voip.app", "acct", SECONDARY));

        assert_eq!(
            h.registry.clear_by_owner("com.voip.app", &SECONDARY),
            MutationOutcome::Committed
        );
        assert!(h
            .registry
            .account(&test_handle("com.voip.app", "acct", SECONDARY))
            .is_none());
        assert!(h
            .registry
            .account(&test_handle("com.voip.app", "acct", UserScope::ROOT))
            .is_some());
    }

    #[test]
    fn sim_call_manager_selection_is_per_visibility() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let h = RegistryHarness::new(dir.path().join("state.bin"));
        h.scopes.add_scope(SECONDARY, 100);

        h.install_and_register(connection_manager_account("com.mgr", "cm", UserScope::ROOT));
        let manager = test_handle("com.mgr", "cm", UserScope::ROOT);
        h.registry.set_sim_call_manager(Some(manager.clone()));

        assert_eq!(h.registry.sim_call_manager(&UserScope::ROOT), Some(manager));
        // The manager account belongs to the root user; the secondary user
        // gets no manager.
        h.registry.set_current_scope(Some(SECONDARY));
        assert_eq!(h.registry.sim_call_manager(&SECONDARY), None);
    }

    #[test]
    fn listeners_observe_the_full_flow() {
        init_test_logging();

        #[derive(Default)]
        struct Recorder {
            accounts: AtomicUsize,
            defaults: AtomicUsize,
            managers: AtomicUsize,
        }
        impl RegistryListener for Recorder {
            fn on_accounts_changed(&self) {
                self.accounts.fetch_add(1, Ordering::SeqCst);
            }
            fn on_default_outgoing_changed(&self) {
                self.defaults.fetch_add(1, Ordering::SeqCst);
            }
            fn on_sim_call_manager_changed(&self) {
                self.managers.fetch_add(1, Ordering::SeqCst);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let h = RegistryHarness::new(dir.path().join("state.bin"));
        let recorder = Arc::new(Recorder::default());
        h.registry.add_listener(recorder.clone());

        h.install_and_register(telephony_account());
        h.install_and_register(connection_manager_account("com.mgr", "cm", UserScope::ROOT));
        let sim = test_handle("com.carrier.telephony", "sim0", UserScope::ROOT);
        let manager = test_handle("com.mgr", "cm", UserScope::ROOT);

        h.registry.set_default_outgoing(Some(sim.clone()));
        h.registry.set_sim_call_manager(Some(manager));
        h.registry.unregister(&sim);

        assert_eq!(recorder.accounts.load(Ordering::SeqCst), 3);
        assert_eq!(recorder.defaults.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.managers.load(Ordering::SeqCst), 1);
    }
}
