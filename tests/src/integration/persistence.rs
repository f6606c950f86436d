//! # Durability Scenarios
//!
//! Simulated process restarts: state survives, legacy files self-upgrade
//! on load, accounts owned by deleted users are pruned, and a corrupt
//! file degrades to an empty registry instead of a crash.

#[cfg(test)]
mod tests {
    use crate::init_test_logging;
    use std::fs;
    use tc_account_registry::adapters::{InMemoryScopeIdentity, StaticPlatformConfig};
    use tc_account_registry::test_utils::{
        call_provider_account, sim_account, test_handle, write_legacy_v1_state_file,
        RegistryHarness,
    };
    use tc_account_registry::{scheme, AccountIcon, ComponentName, PhoneAccountHandle, UserScope};

    #[test]
    fn state_survives_restart() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("state.bin");

        let handle = test_handle("com.voip.app", "acct", UserScope::ROOT);
        let sim = test_handle("com.carrier", "sim0", UserScope::ROOT);
        {
            let h = RegistryHarness::new(&state_file);
            h.install_and_register(call_provider_account("com.voip.app", "acct", UserScope::ROOT));
            h.install_and_register(sim_account("com.carrier", "sim0", UserScope::ROOT));
            h.registry.set_enabled(&handle, true);
            h.registry.set_default_outgoing(Some(sim.clone()));
            h.registry.set_sim_call_manager(None);
        }

        let h = RegistryHarness::new(&state_file);
        h.resolver.add_component(&handle.component);
        h.resolver.add_component(&sim.component);

        assert!(h.registry.account(&handle).unwrap().enabled);
        assert!(h.registry.account(&sim).unwrap().enabled);
        assert_eq!(
            h.registry.user_selected_outgoing(&UserScope::ROOT),
            Some(sim)
        );
        // The explicit "no sim call manager" choice survives too.
        assert_eq!(h.registry.sim_call_manager(&UserScope::ROOT), None);
    }

    #[test]
    fn version_1_file_upgrades_on_load_and_is_rewritten() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("state.bin");

        let sip_handle = PhoneAccountHandle::new(
            ComponentName::new(
                "com.android.phone",
                "com.android.services.telephony.sip.SipConnectionService",
            ),
            "sip0",
            Some(UserScope::ROOT),
        );
        let plain_handle = test_handle("com.voip.app", "acct", UserScope::ROOT);

        let scopes = InMemoryScopeIdentity::new();
        scopes.add_scope(UserScope::ROOT, 0);
        write_legacy_v1_state_file(
            &state_file,
            &[
                (sip_handle.clone(), 0, true),
                (plain_handle.clone(), 0, true),
            ],
            &scopes,
        )
        .unwrap();
        let legacy_bytes = fs::read(&state_file).unwrap();

        let h = RegistryHarness::with_platform(
            &state_file,
            StaticPlatformConfig {
                default_connection_manager: None,
                use_sip_for_pstn: true,
            },
        );

        // Scheme sets were synthesized per component.
        let sip = h.registry.account(&sip_handle).unwrap();
        assert_eq!(
            sip.supported_uri_schemes,
            vec![scheme::SIP.to_string(), scheme::TEL.to_string()]
        );
        let plain = h.registry.account(&plain_handle).unwrap();
        assert_eq!(
            plain.supported_uri_schemes,
            vec![scheme::TEL.to_string(), scheme::VOICEMAIL.to_string()]
        );
        // Pre-icon records fall back to a package resource reference.
        assert!(matches!(
            plain.icon,
            Some(AccountIcon::Resource { ref package, .. }) if package == "com.voip.app"
        ));

        // The upgraded state was re-persisted at the current schema, so a
        // second start loads it without running the upgrade again.
        assert_ne!(fs::read(&state_file).unwrap(), legacy_bytes);
        let again = RegistryHarness::new(&state_file);
        assert_eq!(
            again.registry.account(&sip_handle).unwrap().supported_uri_schemes,
            sip.supported_uri_schemes
        );
    }

    #[test]
    fn accounts_of_deleted_users_are_pruned_on_load() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("state.bin");

        let gone_scope = UserScope::new(10);
        let root_handle = test_handle("com.voip.app", "acct", UserScope::ROOT);
        let gone_handle = test_handle("com.voip.app", "acct", gone_scope);
        {
            let h = RegistryHarness::new(&state_file);
            h.scopes.add_scope(gone_scope, 100);
            h.install_and_register(call_provider_account("com.voip.app", "acct", UserScope::ROOT));
            h.install_and_register(call_provider_account("com.voip.app", "acct", gone_scope));
        }

        // Restart without user 10: serial 100 no longer resolves.
        let h = RegistryHarness::new(&state_file);
        assert!(h.registry.account(&root_handle).is_some());
        assert!(h.registry.account(&gone_handle).is_none());

        // The pruned state was persisted, so the account stays gone even
        // if the scope later reappears.
        let again = RegistryHarness::new(&state_file);
        again.scopes.add_scope(gone_scope, 100);
        assert!(again.registry.account(&gone_handle).is_none());
    }

    #[test]
    fn corrupt_state_file_degrades_to_empty_registry() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("state.bin");
        fs::write(&state_file, b"definitely not registry state").unwrap();

        let h = RegistryHarness::new(&state_file);
        assert!(h.registry.all_accounts(&UserScope::ROOT).is_empty());

        // The registry is fully functional and overwrites the bad file on
        // the next mutation.
        h.install_and_register(call_provider_account("com.voip.app", "acct", UserScope::ROOT));
        let h2 = RegistryHarness::new(&state_file);
        assert!(h2
            .registry
            .account(&test_handle("com.voip.app", "acct", UserScope::ROOT))
            .is_some());
    }
}
