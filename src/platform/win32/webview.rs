// ── WebView2 render host ──────────────────────────────────────────────────────
//
// Owns the embedded browser surface inside the main window.  Startup is a
// chain of single-shot COM completion callbacks, all delivered on the UI
// thread through the message loop:
//
//   present ─► environment created ─► controller created ─► navigate (once)
//
// The navigation guard and the capability lockdown are wired to the
// NavigationStarting / NavigationCompleted events before the one navigation
// is issued, so the bootstrap navigation itself arms the guard.

#![allow(unsafe_code)]

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use webview2_com::{
    take_pwstr, CoreWebView2EnvironmentOptions, CreateCoreWebView2ControllerCompletedHandler,
    CreateCoreWebView2EnvironmentCompletedHandler, NavigationCompletedEventHandler,
    NavigationStartingEventHandler, NewWindowRequestedEventHandler,
    Microsoft::Web::WebView2::Win32::{
        CreateCoreWebView2EnvironmentWithOptions, ICoreWebView2, ICoreWebView2Controller,
        ICoreWebView2Environment, ICoreWebView2EnvironmentOptions, ICoreWebView2Settings,
        ICoreWebView2_3, COREWEBVIEW2_HOST_RESOURCE_ACCESS_KIND_DENY_CORS,
    },
};
use windows::{
    core::{Interface, HSTRING, PCWSTR, PWSTR},
    Win32::{
        Foundation::{E_POINTER, HWND, RECT},
        UI::WindowsAndMessaging::{DestroyWindow, GetClientRect},
    },
};

use crate::{
    document::VIRTUAL_HOST_NAME,
    error::{PreviewError, Result},
    surface::{
        guard::{NavigationGuard, Verdict},
        lockdown::{Capability, LockdownPolicy, SurfaceSettings},
    },
};

// ── RenderHost ────────────────────────────────────────────────────────────────

/// The embedded browser surface of one window.
///
/// Lives in an `Rc` shared by the window procedure and the engine callbacks;
/// every access happens on the UI thread, so `RefCell` is enough.
pub(crate) struct RenderHost {
    hwnd: HWND,
    lockdown: LockdownPolicy,
    /// Sole writer: the NavigationStarting callback.
    guard: RefCell<NavigationGuard>,
    controller: RefCell<Option<ICoreWebView2Controller>>,
    /// First asynchronous startup failure, reported after the loop exits.
    failure: RefCell<Option<PreviewError>>,
}

impl RenderHost {
    pub(crate) fn new(hwnd: HWND, lockdown: LockdownPolicy) -> Rc<Self> {
        Rc::new(Self {
            hwnd,
            lockdown,
            guard: RefCell::new(NavigationGuard::default()),
            controller: RefCell::new(None),
            failure: RefCell::new(None),
        })
    }

    /// Start the engine in a private user data folder and, once it is up,
    /// navigate to `html`.
    ///
    /// Returns as soon as environment creation has been requested; later
    /// failures close the window and are available from `take_failure`.
    pub(crate) fn present(
        self: &Rc<Self>,
        html: String,
        install_dir: PathBuf,
        user_data_dir: &Path,
    ) -> Result<()> {
        std::fs::create_dir_all(user_data_dir)?;

        let host = Rc::clone(self);
        let handler = CreateCoreWebView2EnvironmentCompletedHandler::create(Box::new(
            move |error_code, environment| {
                let result = error_code.and_then(|()| {
                    environment.ok_or_else(|| windows::core::Error::from(E_POINTER))
                });
                match result {
                    Ok(environment) => host.on_environment_created(environment, html, install_dir),
                    Err(e) => host.fail("environment creation", e),
                }
                Ok(())
            },
        ));

        let options: ICoreWebView2EnvironmentOptions =
            CoreWebView2EnvironmentOptions::default().into();
        let data_dir = HSTRING::from(user_data_dir.as_os_str());

        // SAFETY: `data_dir`, `options` and `handler` are live COM objects /
        // strings for the duration of the call; the engine AddRefs what it
        // keeps.  Called on the UI thread, which owns an STA.
        unsafe {
            CreateCoreWebView2EnvironmentWithOptions(PCWSTR::null(), &data_dir, &options, &handler)
        }
        .map_err(|e| engine_error("environment creation", &e))
    }

    fn on_environment_created(
        self: &Rc<Self>,
        environment: ICoreWebView2Environment,
        html: String,
        install_dir: PathBuf,
    ) {
        tracing::debug!("WebView2 environment ready");

        let host = Rc::clone(self);
        let handler = CreateCoreWebView2ControllerCompletedHandler::create(Box::new(
            move |error_code, controller| {
                let result = error_code
                    .and_then(|()| controller.ok_or_else(|| windows::core::Error::from(E_POINTER)))
                    .and_then(|controller| host.on_controller_created(controller, &html, &install_dir));
                if let Err(e) = result {
                    host.fail("surface initialisation", e);
                }
                Ok(())
            },
        ));

        // SAFETY: `self.hwnd` is the live main window that owns this host;
        // `handler` is a valid COM callback kept alive by the engine.
        if let Err(e) = unsafe { environment.CreateCoreWebView2Controller(self.hwnd, &handler) } {
            self.fail("surface initialisation", e);
        }
    }

    fn on_controller_created(
        self: &Rc<Self>,
        controller: ICoreWebView2Controller,
        html: &str,
        install_dir: &Path,
    ) -> windows::core::Result<()> {
        // SAFETY: `controller` was just handed to us by the engine and is used
        // on the UI thread only.  All string arguments outlive their calls.
        unsafe {
            controller.SetBounds(self.client_rect())?;
            controller.SetIsVisible(true)?;

            let webview = controller.CoreWebView2()?;

            // https://PowerToysLocalMonaco/… → the installation directory.
            // DenyCors keeps the mapping same-origin only.
            webview.cast::<ICoreWebView2_3>()?.SetVirtualHostNameToFolderMapping(
                &HSTRING::from(VIRTUAL_HOST_NAME),
                &HSTRING::from(install_dir.as_os_str()),
                COREWEBVIEW2_HOST_RESOURCE_ACCESS_KIND_DENY_CORS,
            )?;

            self.register_handlers(&webview)?;
            *self.controller.borrow_mut() = Some(controller);

            // The one and only navigation.  The document goes in as a string so
            // the previewed file's path never appears as a URL.
            webview.NavigateToString(&HSTRING::from(html))?;
        }

        tracing::info!("bootstrap navigation issued");
        Ok(())
    }

    fn register_handlers(self: &Rc<Self>, webview: &ICoreWebView2) -> windows::core::Result<()> {
        let mut token = 0;

        let host = Rc::clone(self);
        let on_starting = NavigationStartingEventHandler::create(Box::new(move |_sender, args| {
            let Some(args) = args else {
                return Ok(());
            };
            let mut uri = PWSTR::null();
            // SAFETY: `args` is valid for the duration of the event; the
            // returned string is freed by `take_pwstr`.
            unsafe { args.Uri(&mut uri)? };
            let uri = take_pwstr(uri);

            let verdict = host.guard.borrow_mut().on_navigation_starting(&uri);
            tracing::debug!(?verdict, scheme = uri_scheme(&uri), "navigation starting");
            if verdict == Verdict::Cancel {
                // SAFETY: as above; cancelling is silent by design.
                unsafe { args.SetCancel(true)? };
            }
            Ok(())
        }));

        let host = Rc::clone(self);
        let on_completed = NavigationCompletedEventHandler::create(Box::new(move |sender, _args| {
            // Only the first completion after arming is the trusted document.
            if !host.guard.borrow_mut().on_navigation_completed() {
                return Ok(());
            }
            let Some(webview) = sender else {
                return Ok(());
            };
            // SAFETY: `webview` is the sender of this event, alive for the
            // duration of the callback.
            let locked = unsafe { webview.Settings() }
                .and_then(|settings| host.lockdown.apply(&mut WebViewSettings(settings)));
            match locked {
                Ok(()) => tracing::info!(
                    context_menus_disabled = host.lockdown.disable_context_menus,
                    "surface locked down"
                ),
                // A surface that could not be locked down is not shown.
                Err(e) => host.fail("lockdown", e),
            }
            Ok(())
        }));

        // Popups (`window.open`, `target=_blank`) are handled and dropped.
        let on_new_window = NewWindowRequestedEventHandler::create(Box::new(|_sender, args| {
            if let Some(args) = args {
                // SAFETY: `args` is valid for the duration of the event.
                unsafe { args.SetHandled(true)? };
                tracing::debug!("new window request suppressed");
            }
            Ok(())
        }));

        // SAFETY: `webview` is live; the handlers are COM objects the engine
        // AddRefs.  The tokens are not needed: the handlers stay registered
        // for the lifetime of the surface.
        unsafe {
            webview.add_NavigationStarting(&on_starting, &mut token)?;
            webview.add_NavigationCompleted(&on_completed, &mut token)?;
            webview.add_NewWindowRequested(&on_new_window, &mut token)?;
        }
        Ok(())
    }

    /// Fit the surface to the window's client area.
    pub(crate) fn resize(&self) {
        if let Some(controller) = self.controller.borrow().as_ref() {
            // SAFETY: the controller is alive while stored in `self`.
            if let Err(e) = unsafe { controller.SetBounds(self.client_rect()) } {
                tracing::warn!(error = %e, "could not resize surface");
            }
        }
    }

    /// Tear down the surface.  Called from WM_DESTROY.
    pub(crate) fn close(&self) {
        if let Some(controller) = self.controller.borrow_mut().take() {
            // SAFETY: closing a live controller once; it is dropped right after.
            let _ = unsafe { controller.Close() };
        }
    }

    /// The startup failure that closed the window, if any.
    pub(crate) fn take_failure(&self) -> Option<PreviewError> {
        self.failure.borrow_mut().take()
    }

    fn client_rect(&self) -> RECT {
        let mut rect = RECT::default();
        // SAFETY: `rect` is a valid out-pointer; a stale hwnd only makes the
        // call fail, leaving an empty rect.
        let _ = unsafe { GetClientRect(self.hwnd, &mut rect) };
        rect
    }

    /// Record an asynchronous startup failure and close the window, which
    /// ends the message loop.
    fn fail(&self, stage: &'static str, e: windows::core::Error) {
        let error = engine_error(stage, &e);
        tracing::error!(%error, "render host failed");
        {
            let mut failure = self.failure.borrow_mut();
            if failure.is_none() {
                *failure = Some(error);
            }
        }
        // SAFETY: `self.hwnd` is the main window; DestroyWindow is called on
        // the thread that created it.
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

// ── Settings adapter ──────────────────────────────────────────────────────────

/// `ICoreWebView2Settings` seen through the lockdown policy.
struct WebViewSettings(ICoreWebView2Settings);

impl SurfaceSettings for WebViewSettings {
    type Error = windows::core::Error;

    fn set_capability(&mut self, capability: Capability, enabled: bool) -> windows::core::Result<()> {
        let s = &self.0;
        // SAFETY: plain property setters on a live settings object.
        unsafe {
            match capability {
                Capability::DevTools => s.SetAreDevToolsEnabled(enabled),
                Capability::ScriptDialogs => s.SetAreDefaultScriptDialogsEnabled(enabled),
                Capability::Script => s.SetIsScriptEnabled(enabled),
                Capability::ZoomControl => s.SetIsZoomControlEnabled(enabled),
                Capability::BuiltInErrorPage => s.SetIsBuiltInErrorPageEnabled(enabled),
                Capability::StatusBar => s.SetIsStatusBarEnabled(enabled),
                Capability::ContextMenus => s.SetAreDefaultContextMenusEnabled(enabled),
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn engine_error(stage: &'static str, e: &windows::core::Error) -> PreviewError {
    PreviewError::BrowserEngineInit {
        stage,
        // HRESULT.0 is i32; reinterpret bits as u32 for display purposes.
        code: e.code().0 as u32,
    }
}

/// Scheme of `uri`, for logging.  In-memory documents carry their whole body
/// in the URI, so the rest is never logged.
fn uri_scheme(uri: &str) -> &str {
    uri.split(':').next().unwrap_or_default()
}
