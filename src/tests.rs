#[cfg(test)]
mod tests {
    use crate::models::{Category, Folder, MediaItem, MediaType, Role, Visibility};

    fn folder(id: i64, visible_to: Option<Visibility>, allowed: &[&str], protected: bool) -> Folder {
        Folder {
            id,
            name: format!("Folder {}", id),
            category: Category::Photos,
            visible_to,
            allowed_users: allowed.iter().map(|u| u.to_string()).collect(),
            password_hash: None,
            protected,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn item(id: i64, media_type: MediaType, title: &str, folder_id: Option<i64>, created_at: &str) -> MediaItem {
        MediaItem {
            id,
            media_type,
            folder_id,
            url: format!("http://localhost:3000/media/photos/{}.jpg", id),
            thumbnail_url: None,
            storage_key: None,
            thumbnail_key: None,
            title: title.to_string(),
            category: "Uploads".to_string(),
            created_at: created_at.to_string(),
        }
    }

    fn principal(username: &str, role: Role) -> crate::services::access::Principal<'_> {
        crate::services::access::Principal { username, role }
    }

    mod access_tests {
        use super::*;
        use crate::services::access::{
            can_edit, folder_access, is_admin, is_folder_visible, FolderAccess, UnlockRegistry,
        };

        #[test]
        fn test_admin_sees_every_folder() {
            let admin = principal("root", Role::Admin);
            for visible_to in [None, Some(Visibility::All), Some(Visibility::Editor), Some(Visibility::Admin)] {
                assert!(is_folder_visible(admin, &folder(1, visible_to, &[], false)));
            }
        }

        #[test]
        fn test_editor_visibility() {
            let editor = principal("ed", Role::Editor);
            assert!(is_folder_visible(editor, &folder(1, None, &[], false)));
            assert!(is_folder_visible(editor, &folder(1, Some(Visibility::All), &[], false)));
            assert!(is_folder_visible(editor, &folder(1, Some(Visibility::Editor), &[], false)));
            assert!(!is_folder_visible(editor, &folder(1, Some(Visibility::Admin), &[], false)));
        }

        #[test]
        fn test_viewer_needs_explicit_grant() {
            let viewer = principal("vi", Role::Viewer);
            for visible_to in [None, Some(Visibility::All), Some(Visibility::Editor), Some(Visibility::Admin)] {
                assert!(!is_folder_visible(viewer, &folder(1, visible_to, &[], false)));
                assert!(is_folder_visible(viewer, &folder(1, visible_to, &["vi"], false)));
            }
        }

        #[test]
        fn test_allowed_users_override_admin_only() {
            let editor = principal("ed", Role::Editor);
            let f = folder(1, Some(Visibility::Admin), &["someone", "ed"], false);
            assert!(is_folder_visible(editor, &f));
        }

        #[test]
        fn test_allowed_users_match_exactly() {
            let viewer = principal("Vi", Role::Viewer);
            assert!(!is_folder_visible(viewer, &folder(1, None, &["vi"], false)));
        }

        #[test]
        fn test_protected_folder_needs_password_unless_admin() {
            let f = folder(1, Some(Visibility::Editor), &["vi"], true);
            assert_eq!(
                folder_access(principal("root", Role::Admin), &f, false),
                FolderAccess::Granted
            );
            assert_eq!(
                folder_access(principal("ed", Role::Editor), &f, false),
                FolderAccess::NeedsPassword
            );
            assert_eq!(
                folder_access(principal("ed", Role::Editor), &f, true),
                FolderAccess::Granted
            );
            assert_eq!(
                folder_access(principal("vi", Role::Viewer), &f, false),
                FolderAccess::NeedsPassword
            );
        }

        #[test]
        fn test_hidden_wins_over_unlock() {
            let f = folder(1, Some(Visibility::Admin), &[], true);
            assert_eq!(
                folder_access(principal("ed", Role::Editor), &f, true),
                FolderAccess::Hidden
            );
        }

        #[test]
        fn test_role_capabilities() {
            assert!(can_edit(Role::Admin));
            assert!(can_edit(Role::Editor));
            assert!(!can_edit(Role::Viewer));
            assert!(is_admin(Role::Admin));
            assert!(!is_admin(Role::Editor));
        }

        #[test]
        fn test_unlock_registry_is_per_session() {
            let registry = UnlockRegistry::default();
            registry.unlock("a", 1);
            registry.unlock("a", 2);
            registry.unlock("b", 1);

            assert!(registry.is_unlocked("a", 2));
            assert!(!registry.is_unlocked("b", 2));

            registry.relock(1);
            assert!(!registry.is_unlocked("a", 1));
            assert!(!registry.is_unlocked("b", 1));
            assert!(registry.is_unlocked("a", 2));

            registry.forget("a");
            assert!(registry.unlocked_folders("a").is_empty());
        }
    }

    mod gallery_tests {
        use super::*;
        use crate::models::Tab;
        use crate::services::access::FolderAccess;
        use crate::services::gallery::{
            accessible_items, filter_items, folder_item_count, visible_folders, Activation,
            GalleryView, ItemQuery, Lightbox, Player, Selection, SortOrder,
        };
        use std::collections::HashSet;

        fn sample() -> Vec<MediaItem> {
            vec![
                item(1, MediaType::Photo, "beach", None, "2024-03-01T10:00:00.000Z"),
                item(2, MediaType::Photo, "Alps", None, "2024-03-02T10:00:00.000Z"),
                item(3, MediaType::Photo, "Beach party", Some(10), "2024-03-03T10:00:00.000Z"),
                item(4, MediaType::Video, "beach video", None, "2024-03-04T10:00:00.000Z"),
                item(5, MediaType::Audio, "song", None, "2024-03-05T10:00:00.000Z"),
                item(6, MediaType::Audio, "another song", None, "2024-03-06T10:00:00.000Z"),
            ]
        }

        fn ids(items: &[&MediaItem]) -> Vec<i64> {
            items.iter().map(|i| i.id).collect()
        }

        fn query(tab: Tab, folder_id: Option<i64>, search: &str, sort: SortOrder) -> ItemQuery<'_> {
            ItemQuery {
                tab,
                folder_id,
                search,
                sort,
            }
        }

        #[test]
        fn test_root_view_shows_only_root_items_of_type() {
            let items = sample();
            let shown = filter_items(&items, &query(Tab::Photos, None, "", SortOrder::Date), &HashSet::new());
            assert_eq!(ids(&shown), vec![2, 1]);
        }

        #[test]
        fn test_folder_view_shows_folder_items() {
            let items = sample();
            let shown = filter_items(
                &items,
                &query(Tab::Photos, Some(10), "", SortOrder::Date),
                &HashSet::new(),
            );
            assert_eq!(ids(&shown), vec![3]);
        }

        #[test]
        fn test_search_ignores_folders_and_case() {
            let items = sample();
            let shown = filter_items(
                &items,
                &query(Tab::Photos, None, "  BEACH ", SortOrder::Name),
                &HashSet::new(),
            );
            assert_eq!(ids(&shown), vec![1, 3]);
        }

        #[test]
        fn test_blank_search_keeps_folder_view() {
            let items = sample();
            let shown = filter_items(
                &items,
                &query(Tab::Photos, Some(10), "   ", SortOrder::Date),
                &HashSet::new(),
            );
            assert_eq!(ids(&shown), vec![3]);
        }

        #[test]
        fn test_favorites_tab_ignores_type_and_search() {
            let items = sample();
            let favorites: HashSet<i64> = [3, 5].into_iter().collect();
            let shown = filter_items(
                &items,
                &query(Tab::Favorites, None, "zzz", SortOrder::Date),
                &favorites,
            );
            assert_eq!(ids(&shown), vec![5, 3]);
        }

        #[test]
        fn test_sort_by_name_is_case_insensitive_and_total() {
            let items = vec![
                item(1, MediaType::Photo, "b", None, "2024-01-01T00:00:00Z"),
                item(2, MediaType::Photo, "A", None, "2024-01-01T00:00:00Z"),
                item(3, MediaType::Photo, "a", None, "2024-01-01T00:00:00Z"),
                item(4, MediaType::Photo, "a", None, "2024-01-01T00:00:00Z"),
            ];
            let shown = filter_items(&items, &query(Tab::Photos, None, "", SortOrder::Name), &HashSet::new());
            assert_eq!(ids(&shown), vec![2, 3, 4, 1]);
        }

        #[test]
        fn test_sort_by_date_handles_mixed_formats() {
            let items = vec![
                item(1, MediaType::Photo, "x", None, "2024-01-02 08:00:00"),
                item(2, MediaType::Photo, "y", None, "2024-01-03T08:00:00.000Z"),
                item(3, MediaType::Photo, "z", None, "2024-01-01T08:00:00+00:00"),
            ];
            let shown = filter_items(&items, &query(Tab::Photos, None, "", SortOrder::Date), &HashSet::new());
            assert_eq!(ids(&shown), vec![2, 1, 3]);
        }

        #[test]
        fn test_equal_dates_fall_back_to_id() {
            let items = vec![
                item(1, MediaType::Photo, "x", None, "2024-01-01T00:00:00Z"),
                item(2, MediaType::Photo, "y", None, "2024-01-01T00:00:00Z"),
            ];
            let shown = filter_items(&items, &query(Tab::Photos, None, "", SortOrder::Date), &HashSet::new());
            assert_eq!(ids(&shown), vec![2, 1]);
        }

        #[test]
        fn test_folder_item_count() {
            assert_eq!(folder_item_count(&sample(), 10), 1);
            assert_eq!(folder_item_count(&sample(), 11), 0);
        }

        #[test]
        fn test_accessible_items_drops_closed_folders() {
            let folders = vec![
                folder(10, Some(Visibility::Editor), &[], false),
                folder(11, Some(Visibility::Editor), &[], true),
            ];
            let mut items = sample();
            items.push(item(7, MediaType::Photo, "secret", Some(11), "2024-03-07T00:00:00Z"));

            let viewer = principal("vi", Role::Viewer);
            let shown = accessible_items(viewer, items.clone(), &folders, &HashSet::new());
            assert!(shown.iter().all(|i| i.folder_id.is_none()));

            let editor = principal("ed", Role::Editor);
            let shown = accessible_items(editor, items.clone(), &folders, &HashSet::new());
            assert!(shown.iter().any(|i| i.id == 3));
            assert!(!shown.iter().any(|i| i.id == 7));

            let unlocked: HashSet<i64> = [11].into_iter().collect();
            let shown = accessible_items(editor, items, &folders, &unlocked);
            assert!(shown.iter().any(|i| i.id == 7));
        }

        #[test]
        fn test_visible_folders() {
            let folders = vec![
                folder(1, Some(Visibility::Admin), &[], false),
                folder(2, Some(Visibility::Editor), &[], false),
                folder(3, None, &["vi"], false),
            ];
            let shown: Vec<i64> = visible_folders(principal("vi", Role::Viewer), &folders)
                .iter()
                .map(|f| f.id)
                .collect();
            assert_eq!(shown, vec![3]);
        }

        #[test]
        fn test_selection_toggle_all() {
            let items = sample();
            let shown: Vec<&MediaItem> = items.iter().take(3).collect();
            let mut selection = Selection::new();

            selection.toggle(1);
            selection.toggle_all(&shown);
            assert_eq!(selection.ids(), vec![1, 2, 3]);

            selection.toggle_all(&shown);
            assert!(selection.is_empty());
        }

        #[test]
        fn test_selection_toggle_all_replaces_stale_ids() {
            let items = sample();
            let shown: Vec<&MediaItem> = items.iter().take(2).collect();
            let mut selection = Selection::new();
            selection.select(99);
            selection.select(1);
            selection.toggle_all(&shown);
            assert_eq!(selection.ids(), vec![1, 2]);
        }

        #[test]
        fn test_toggle_all_on_empty_view_clears() {
            let mut selection = Selection::new();
            selection.select(4);
            selection.toggle_all(&[]);
            assert!(selection.is_empty());
        }

        #[test]
        fn test_selection_toggle_single() {
            let mut selection = Selection::new();
            selection.toggle(5);
            assert!(selection.contains(5));
            selection.toggle(5);
            assert!(!selection.contains(5));
            assert_eq!(selection.len(), 0);
        }

        #[test]
        fn test_select_all_then_deselect_all_is_empty() {
            let ids = [3, 1, 2];
            let mut selection = Selection::new();

            selection.select_all(ids);
            selection.select_all(ids);
            assert_eq!(selection.ids(), vec![1, 2, 3]);

            selection.deselect_all(ids);
            assert!(selection.is_empty());
        }

        #[test]
        fn test_select_and_deselect_single() {
            let mut selection = Selection::new();
            selection.select(7);
            selection.select(7);
            assert_eq!(selection.len(), 1);

            selection.deselect(8);
            assert!(selection.contains(7));
            selection.deselect(7);
            assert!(selection.is_empty());
        }

        #[test]
        fn test_deselect_all_keeps_other_ids() {
            let mut selection = Selection::new();
            selection.select_all([1, 2, 3, 4]);
            selection.deselect_all([2, 4]);
            assert_eq!(selection.ids(), vec![1, 3]);
        }

        #[test]
        fn test_lightbox_wraps_around() {
            assert!(Lightbox::open(3, 3).is_none());
            let mut lightbox = Lightbox::open(2, 3).expect("index in range");
            lightbox.next();
            assert_eq!(lightbox.index(), 0);
            lightbox.prev();
            assert_eq!(lightbox.index(), 2);
        }

        #[test]
        fn test_slideshow_advances_only_while_playing() {
            let mut lightbox = Lightbox::open(0, 2).expect("index in range");
            lightbox.tick();
            assert_eq!(lightbox.index(), 0);
            lightbox.toggle_play();
            lightbox.tick();
            lightbox.tick();
            assert_eq!(lightbox.index(), 0);
            assert!(lightbox.is_playing());
        }

        #[test]
        fn test_player_cycles_tracks() {
            let mut player = Player::default();
            assert!(!player.play(vec![5, 6], 7));
            assert!(player.play(vec![5, 6], 6));
            assert_eq!(player.next(), Some(5));
            assert_eq!(player.prev(), Some(6));
            player.stop();
            assert_eq!(player.current(), None);
        }

        #[test]
        fn test_activate_audio_plays_and_others_open_lightbox() {
            let items = sample();
            let mut view = GalleryView::new(Tab::Music);
            let shown = view.shown(&items, &HashSet::new());
            assert_eq!(view.activate(&shown, 1), Some(Activation::Play(5)));
            assert_eq!(view.player.current(), Some(5));

            let mut photos = GalleryView::new(Tab::Photos);
            let shown = photos.shown(&items, &HashSet::new());
            assert_eq!(photos.activate(&shown, 1), Some(Activation::View(1)));
            assert!(photos.lightbox.is_some());
            assert_eq!(photos.activate(&shown, 9), None);
        }

        #[test]
        fn test_switch_tab_resets_folder_and_selection() {
            let f = folder(10, None, &[], false);
            let mut view = GalleryView::default();
            assert_eq!(
                view.open_folder(principal("ed", Role::Editor), &f, false),
                FolderAccess::Granted
            );
            view.selection.select(3);
            view.switch_tab(Tab::Videos);
            assert!(view.current_folder.is_none());
            assert!(view.selection.is_empty());
            assert_eq!(view.tab, Tab::Videos);
        }

        #[test]
        fn test_open_locked_folder_does_not_enter() {
            let f = folder(10, None, &[], true);
            let mut view = GalleryView::default();
            assert_eq!(
                view.open_folder(principal("ed", Role::Editor), &f, false),
                FolderAccess::NeedsPassword
            );
            assert!(view.current_folder.is_none());
        }

        #[test]
        fn test_forget_items_stops_deleted_track() {
            let items = sample();
            let mut view = GalleryView::new(Tab::Music);
            let shown = view.shown(&items, &HashSet::new());
            view.activate(&shown, 0);
            view.selection.select(6);
            view.selection.select(5);
            view.forget_items(&[6]);
            assert_eq!(view.selection.ids(), vec![5]);
            assert_eq!(view.player.current(), None);
        }
    }

    mod share_tests {
        use super::*;
        use crate::services::share::{encode_component, link_for_agent, share_file_name, share_links};

        #[test]
        fn test_encode_component_matches_uri_component() {
            assert_eq!(encode_component("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
            assert_eq!(encode_component("keep-_.!~*'()"), "keep-_.!~*'()");
        }

        #[test]
        fn test_share_links() {
            let it = item(1, MediaType::Video, "My clip", None, "2024-01-01T00:00:00Z");
            let links = share_links(&it);
            assert_eq!(links.text, "Check out this video: My clip");
            assert_eq!(links.platforms.len(), 3);
            assert!(links.platforms[0]
                .url
                .starts_with("https://wa.me/?text=Check%20out%20this%20video%3A%20My%20clip%20http"));
            assert!(links.platforms[1].url.starts_with("https://t.me/share/url?url=http%3A%2F%2F"));
            assert!(links.platforms[2].url.contains("app_id=123456789"));
        }

        #[test]
        fn test_share_file_name_extension() {
            let audio = item(1, MediaType::Audio, "tune", None, "");
            let photo = item(2, MediaType::Photo, "", None, "");
            assert_eq!(share_file_name(&audio), "tune.mp3");
            assert_eq!(share_file_name(&photo), "media-file.jpg");
        }

        #[test]
        fn test_messenger_prefers_deep_link_on_mobile() {
            let it = item(1, MediaType::Photo, "p", None, "");
            let links = share_links(&it);
            let messenger = &links.platforms[2];
            assert!(link_for_agent(messenger, "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)")
                .starts_with("fb-messenger://share/?link="));
            assert!(link_for_agent(messenger, "Mozilla/5.0 (X11; Linux x86_64)")
                .starts_with("https://www.facebook.com/dialog/send"));
            let whatsapp = &links.platforms[0];
            assert_eq!(link_for_agent(whatsapp, "Android"), whatsapp.url);
        }
    }

    mod model_tests {
        use crate::models::{AppSettings, Category, Language, Role, SettingsPatch, Tab, Theme};

        #[test]
        fn test_role_parse_and_display() {
            assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
            assert_eq!(" Editor ".parse::<Role>(), Ok(Role::Editor));
            assert!("author".parse::<Role>().is_err());
            assert_eq!(Role::Viewer.to_string(), "Viewer");
        }

        #[test]
        fn test_default_permissions() {
            assert_eq!(Role::Admin.default_permissions(), vec!["all"]);
            assert_eq!(Role::Editor.default_permissions(), vec!["upload", "edit"]);
            assert_eq!(Role::Viewer.default_permissions(), vec!["view"]);
        }

        #[test]
        fn test_tab_category_mapping() {
            for category in Category::ALL {
                assert_eq!(category.tab().category(), Some(category));
            }
            assert_eq!(Tab::Favorites.category(), None);
            assert_eq!(Tab::Favorites.media_type(), None);
            assert_eq!("music".parse::<Category>(), Ok(Category::Music));
            assert!("favorites".parse::<Category>().is_err());
        }

        #[test]
        fn test_settings_defaults_and_direction() {
            let mut settings = AppSettings::default();
            assert_eq!(settings.theme, Theme::Dark);
            assert_eq!(settings.accent_color, "#7c3aed");
            assert_eq!(settings.secondary_color, "#db2777");
            assert!(settings.hover_preview);
            assert_eq!(settings.direction(), "ltr");

            settings.apply(SettingsPatch {
                language: Some(Language::Ar),
                ..SettingsPatch::default()
            });
            assert_eq!(settings.direction(), "rtl");
            assert_eq!(settings.theme, Theme::Dark);
        }

        #[test]
        fn test_settings_serialize_camel_case() {
            let json = serde_json::to_value(AppSettings::default()).expect("serializes");
            assert_eq!(json["accentColor"], "#7c3aed");
            assert_eq!(json["hoverPreview"], true);
            assert_eq!(json["language"], "en");
        }
    }

    mod auth_tests {
        use crate::services::auth::{
            generate_session_token, hash_password, validate_password, verify_password,
        };

        #[test]
        fn test_password_hash_roundtrip() {
            let hash = hash_password("secret").expect("hashes");
            assert!(verify_password("secret", &hash));
            assert!(!verify_password("Secret", &hash));
        }

        #[test]
        fn test_password_policy() {
            assert!(validate_password("abcd").is_ok());
            assert!(validate_password("abc").is_err());
            assert!(validate_password("    ").is_err());
        }

        #[test]
        fn test_verify_against_garbage_hash() {
            assert!(!verify_password("anything", "not-a-hash"));
        }

        #[test]
        fn test_session_tokens_are_unique() {
            let a = generate_session_token();
            let b = generate_session_token();
            assert_ne!(a, b);
            assert_eq!(a.len(), 43);
        }
    }

    mod storage_tests {
        use crate::services::storage::{sanitize_file_name, Storage};

        #[test]
        fn test_sanitize_file_name() {
            assert_eq!(sanitize_file_name("my photo.JPG"), "my_photo.JPG");
            assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
            assert_eq!(sanitize_file_name("..."), "file");
        }

        #[test]
        fn test_resolve_rejects_escape() {
            let storage = Storage::new("/tmp/bucket", "http://localhost:3000");
            assert!(storage.resolve("photos/1-a.jpg").is_ok());
            assert!(storage.resolve("../secret").is_err());
            assert!(storage.resolve("/etc/passwd").is_err());
            assert!(storage.resolve("").is_err());
        }

        #[test]
        fn test_public_url() {
            let storage = Storage::new("/tmp/bucket", "http://localhost:3000/");
            assert_eq!(
                storage.public_url("photos/1-a.jpg"),
                "http://localhost:3000/media/photos/1-a.jpg"
            );
        }
    }

    mod media_tests {
        use crate::services::image::{fit_within, generate_thumbnail, optimized_url, Variant};
        use crate::services::media::{detect_mime, title_from_file_name};

        #[test]
        fn test_title_from_file_name() {
            assert_eq!(title_from_file_name("holiday.2024.jpg"), "holiday");
            assert_eq!(title_from_file_name("noext"), "noext");
            assert_eq!(title_from_file_name(".hidden"), ".hidden");
        }

        #[test]
        fn test_fit_within() {
            assert_eq!(fit_within(100, 50, 300), (100, 50));
            assert_eq!(fit_within(600, 300, 300), (300, 150));
            assert_eq!(fit_within(300, 900, 300), (100, 300));
            assert_eq!(fit_within(3000, 1, 300), (300, 1));
        }

        #[test]
        fn test_generate_thumbnail_is_jpeg_within_bounds() {
            let img = image::RgbImage::from_pixel(640, 320, image::Rgb([200, 30, 30]));
            let mut png = std::io::Cursor::new(Vec::new());
            img.write_to(&mut png, image::ImageFormat::Png).expect("encodes png");

            let thumb = generate_thumbnail(png.get_ref(), Some(300)).expect("thumbnail");
            assert_eq!(&thumb[..2], &[0xFF, 0xD8]);
            let decoded = image::load_from_memory(&thumb).expect("decodes");
            assert_eq!((decoded.width(), decoded.height()), (300, 150));
        }

        #[test]
        fn test_optimized_url() {
            assert_eq!(optimized_url("full", Some("thumb"), Variant::Thumbnail), "thumb");
            assert_eq!(optimized_url("full", Some("thumb"), Variant::Full), "full");
            assert_eq!(optimized_url("full", None, Variant::Thumbnail), "full");
        }

        #[test]
        fn test_detect_mime_prefers_content() {
            let png_magic = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
            assert_eq!(detect_mime("fake.mp3", &png_magic), "image/png");
            assert_eq!(detect_mime("song.mp3", b"not really"), "audio/mpeg");
        }
    }

    mod config_tests {
        use crate::config::{parse_days, parse_size, Config};

        #[test]
        fn test_parse_size() {
            assert_eq!(parse_size("50MB").unwrap(), 50 * 1024 * 1024);
            assert_eq!(parse_size("512kb").unwrap(), 512 * 1024);
            assert_eq!(parse_size("1GB").unwrap(), 1024 * 1024 * 1024);
            assert_eq!(parse_size("100").unwrap(), 100);
            assert!(parse_size("lots").is_err());
            assert!(parse_size("18446744073709551615GB").is_err());
        }

        #[test]
        fn test_parse_days() {
            assert_eq!(parse_days("1d").unwrap(), 1);
            assert_eq!(parse_days("2w").unwrap(), 14);
            assert_eq!(parse_days("30").unwrap(), 30);
            assert!(parse_days("soon").is_err());
            assert!(parse_days("9223372036854775807w").is_err());
        }

        #[test]
        fn test_minimal_config_uses_defaults() {
            let config: Config = toml::from_str(
                r#"
                [site]
                title = "Vault"
                url = "http://localhost:3000"

                [database]
                path = "./data/mediavault.db"

                [media]
                upload_dir = "./data/media"
                "#,
            )
            .unwrap();

            assert!(config.validate().is_ok());
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.media.max_upload_bytes().unwrap(), 50 * 1024 * 1024);
            assert_eq!(config.auth.session_days().unwrap(), 1);
            assert_eq!(config.auth.remember_days().unwrap(), 30);
        }

        #[test]
        fn test_trailing_slash_url_is_rejected() {
            let config: Config = toml::from_str(
                r#"
                [site]
                title = "Vault"
                url = "http://localhost:3000/"

                [database]
                path = "db"

                [media]
                upload_dir = "media"
                "#,
            )
            .unwrap();
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_huge_lifetime_is_rejected() {
            let config: Config = toml::from_str(
                r#"
                [site]
                title = "Vault"
                url = "http://localhost:3000"

                [database]
                path = "db"

                [media]
                upload_dir = "media"

                [auth]
                remember_lifetime = "100000d"
                "#,
            )
            .unwrap();
            assert!(config.validate().is_err());
        }
    }
}
